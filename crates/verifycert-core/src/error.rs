//! # Error Hierarchy
//!
//! Structured error types for the foundational layer, built with
//! `thiserror`. Registry-level failures live in `verifycert-registry`;
//! this module covers what can go wrong below it: malformed identifiers,
//! canonicalization, and I/O.

use thiserror::Error;

/// Top-level error type for the foundational layer.
#[derive(Error, Debug)]
pub enum VerifyCertError {
    /// Canonicalization failure during digest computation.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Domain primitive validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed during canonicalization.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Validation errors for domain primitive newtypes.
///
/// Each variant carries the rejected input so operators can see exactly
/// what was supplied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Account address is not `0x` followed by 40 hex digits.
    #[error("invalid account address: \"{0}\" (expected 0x followed by 40 hex digits)")]
    InvalidAccount(String),

    /// Certificate identifier is not a positive integer.
    #[error("invalid certificate id: \"{0}\" (expected a positive integer)")]
    InvalidCertificateId(String),

    /// Timestamp is not RFC 3339 or not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
