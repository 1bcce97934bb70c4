//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps registry and validation errors to HTTP status codes with a JSON
//! body of the form `{ "error": { "code", "message" } }`. Internal error
//! details are logged and never returned to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use verifycert_registry::RegistryError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. `NOT_FOUND`, `TRANSFER_NOT_ALLOWED`).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Rejected by the registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Registry(err) => registry_status_and_code(err),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Internal(_)
                | Self::Registry(RegistryError::Journal(_) | RegistryError::IdSpaceExhausted)
        )
    }
}

fn registry_status_and_code(err: &RegistryError) -> (StatusCode, &'static str) {
    match err {
        RegistryError::CertificateNotFound(_) => (StatusCode::NOT_FOUND, "CERTIFICATE_NOT_FOUND"),
        RegistryError::UnauthorizedIssuer { .. } => (StatusCode::FORBIDDEN, "UNAUTHORIZED_ISSUER"),
        RegistryError::NotOwner { .. } => (StatusCode::FORBIDDEN, "NOT_OWNER"),
        RegistryError::TransferNotAllowed { .. } => (StatusCode::FORBIDDEN, "TRANSFER_NOT_ALLOWED"),
        RegistryError::InvalidRecipient => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_RECIPIENT"),
        RegistryError::InvalidAccount { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_ACCOUNT"),
        RegistryError::CertificateAlreadyRevoked(_) => {
            (StatusCode::CONFLICT, "CERTIFICATE_ALREADY_REVOKED")
        }
        RegistryError::IdSpaceExhausted | RegistryError::Journal(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if self.is_internal() {
            tracing::error!(error = %self, "internal server error");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Malformed account or id strings in a request are validation failures.
impl From<verifycert_core::ValidationError> for AppError {
    fn from(err: verifycert_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use verifycert_core::{AccountId, CertificateId};

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[test]
    fn registry_errors_map_to_status_codes() {
        let cases = [
            (
                RegistryError::CertificateNotFound(CertificateId::new(1)),
                StatusCode::NOT_FOUND,
            ),
            (
                RegistryError::UnauthorizedIssuer {
                    caller: AccountId::from_bytes([1u8; 20]),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                RegistryError::NotOwner {
                    caller: AccountId::from_bytes([1u8; 20]),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                RegistryError::TransferNotAllowed { operation: "approve" },
                StatusCode::FORBIDDEN,
            ),
            (RegistryError::InvalidRecipient, StatusCode::UNPROCESSABLE_ENTITY),
            (
                RegistryError::InvalidAccount { role: "issuer" },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                RegistryError::CertificateAlreadyRevoked(CertificateId::new(1)),
                StatusCode::CONFLICT,
            ),
            (RegistryError::IdSpaceExhausted, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let (status, _) = AppError::from(err.clone()).status_and_code();
            assert_eq!(status, expected, "{err:?}");
        }
    }

    #[test]
    fn validation_error_from_core() {
        let err = AppError::from(verifycert_core::ValidationError::InvalidAccount("0x12".into()));
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("0x12")));
    }

    #[tokio::test]
    async fn into_response_carries_registry_code() {
        let (status, body) = response_parts(AppError::from(
            RegistryError::CertificateAlreadyRevoked(CertificateId::new(4)),
        ))
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error.code, "CERTIFICATE_ALREADY_REVOKED");
        assert!(body.error.message.contains('4'));
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) =
            response_parts(AppError::Internal("ledger disk full".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert_eq!(body.error.message, "An internal error occurred");
    }

    #[tokio::test]
    async fn journal_failure_is_hidden_too() {
        let (status, body) =
            response_parts(AppError::from(RegistryError::Journal("float in preimage".into()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.error.message.contains("float"));
    }
}
