//! # Custom Extractors & Validation
//!
//! The [`Validate`] trait for request DTOs, helpers that map extractor
//! rejections into [`AppError`], and parsing of path segments.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::Json;

use verifycert_core::{AccountId, CertificateId};

use crate::error::AppError;

/// Upper bound on any free-text certificate field, in bytes.
pub const MAX_TEXT_FIELD_BYTES: usize = 4096;

/// Request types that check business rules beyond what serde enforces.
pub trait Validate {
    /// Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Extract a numeric certificate id from the path.
pub fn extract_certificate_id(
    result: Result<Path<u64>, PathRejection>,
) -> Result<CertificateId, AppError> {
    result
        .map(|Path(id)| CertificateId::new(id))
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Parse an account string supplied in a request.
pub fn parse_account(field: &str, value: &str) -> Result<AccountId, AppError> {
    AccountId::parse(value)
        .map_err(|_| AppError::Validation(format!("{field}: '{value}' is not a valid account")))
}

/// Reject text fields above [`MAX_TEXT_FIELD_BYTES`].
pub fn check_text_len(field: &str, value: &str) -> Result<(), String> {
    if value.len() > MAX_TEXT_FIELD_BYTES {
        Err(format!(
            "{field} exceeds {MAX_TEXT_FIELD_BYTES} bytes ({} given)",
            value.len()
        ))
    } else {
        Ok(())
    }
}
