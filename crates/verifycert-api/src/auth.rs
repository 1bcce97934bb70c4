//! # Authentication Middleware
//!
//! Resolves the calling account from the bearer token. Every registry
//! operation is evaluated against that account, so the token carries the
//! account identity rather than a role.
//!
//! ## Token Format
//!
//! ```text
//! Bearer {account}:{secret}  : AUTH_TOKEN configured; secret must match
//! Bearer {account}           : development mode (no AUTH_TOKEN)
//! ```
//!
//! With a token configured, every `/v1` request must authenticate. In
//! development mode the header is optional: requests without it are
//! anonymous and may only read.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtle::ConstantTimeEq;

use verifycert_core::AccountId;

use crate::error::{AppError, ErrorBody, ErrorDetail};

// ── Caller ──────────────────────────────────────────────────────────────────

/// The authenticated account issuing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub AccountId);

impl Caller {
    pub fn account(&self) -> &AccountId {
        &self.0
    }
}

/// Extracts the caller the auth middleware placed in the request extensions.
/// Anonymous requests are rejected with 401.
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized("this operation requires a caller account".into()))
    }
}

/// `Option<Caller>` is `None` for anonymous development-mode requests.
impl<S: Send + Sync> OptionalFromRequestParts<S> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Caller>().copied())
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of shared secrets.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Resolve the caller from a bearer token.
///
/// `expected_secret` is `None` in development mode, where the token is the
/// bare account and any `:{secret}` suffix is ignored.
pub fn parse_bearer_token(provided: &str, expected_secret: Option<&str>) -> Result<Caller, String> {
    let (account, secret) = match provided.split_once(':') {
        Some((account, secret)) => (account, Some(secret)),
        None => (provided, None),
    };

    if let Some(expected) = expected_secret {
        match secret {
            Some(secret) if constant_time_token_eq(secret, expected) => {}
            Some(_) => return Err("invalid bearer token".into()),
            None => return Err("invalid token format: expected {account}:{secret}".into()),
        }
    }

    let account = AccountId::parse(account).map_err(|e| e.to_string())?;
    if account.is_zero() {
        return Err("the null account cannot authenticate".into());
    }
    Ok(Caller(account))
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Validate the `Authorization` header and inject the [`Caller`].
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let expected = request
        .extensions()
        .get::<AuthConfig>()
        .and_then(|c| c.token.clone());

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    match auth_header {
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(token) => match parse_bearer_token(token, expected.as_deref()) {
                Ok(caller) => {
                    request.extensions_mut().insert(caller);
                    next.run(request).await
                }
                Err(msg) => {
                    tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                    unauthorized_response(&msg)
                }
            },
            None => {
                tracing::warn!("authentication failed: non-Bearer authorization scheme");
                unauthorized_response("authorization header must use Bearer scheme")
            }
        },
        None if expected.is_some() => {
            tracing::warn!("authentication failed: missing authorization header");
            unauthorized_response("missing authorization header")
        }
        None => next.run(request).await,
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
