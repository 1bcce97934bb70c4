//! # Certificate Endpoints
//!
//! Issuance, lookup, verification and revocation, plus the transfer and
//! approval endpoints that exist only to refuse.
//!
//! ## Endpoints
//!
//! - `POST /v1/certificates`: Issue a certificate.
//! - `GET  /v1/certificates/{id}`: Certificate record and content digest.
//! - `GET  /v1/certificates/{id}/verify`: Public validity check.
//! - `POST /v1/certificates/{id}/revoke`: Revoke (owner or issuer of record).
//! - `POST /v1/certificates/{id}/transfer`: Always 403.
//! - `POST /v1/certificates/{id}/approve`: Always 403.
//! - `POST /v1/approvals`: Always 403.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use verifycert_core::{AccountId, CertificateId};
use verifycert_registry::{Certificate, CertificateDetails, RegistryError};

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::{
    check_text_len, extract_certificate_id, extract_json, extract_validated_json, parse_account,
    Validate,
};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for certificate issuance.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueCertificateRequest {
    /// Account the certificate is bound to.
    pub recipient: String,
    pub recipient_name: String,
    pub course_name: String,
    pub institution_name: String,
    /// Opaque off-chain metadata location.
    pub metadata_uri: String,
}

impl Validate for IssueCertificateRequest {
    fn validate(&self) -> Result<(), String> {
        check_text_len("recipient_name", &self.recipient_name)?;
        check_text_len("course_name", &self.course_name)?;
        check_text_len("institution_name", &self.institution_name)?;
        check_text_len("metadata_uri", &self.metadata_uri)
    }
}

/// A certificate as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CertificateResponse {
    pub id: u64,
    pub issuer: String,
    pub recipient: String,
    pub recipient_name: String,
    pub course_name: String,
    pub institution_name: String,
    pub metadata_uri: String,
    /// ISO 8601 UTC issuance time.
    pub issue_date: String,
    pub is_valid: bool,
    /// `sha256:<hex>` fingerprint of the immutable fields.
    pub digest: String,
}

impl CertificateResponse {
    fn from_certificate(cert: &Certificate) -> Result<Self, AppError> {
        let digest = cert
            .digest()
            .map_err(|e| AppError::Internal(format!("certificate digest: {e}")))?;
        Ok(Self {
            id: cert.id().value(),
            issuer: cert.issuer().to_string(),
            recipient: cert.recipient().to_string(),
            recipient_name: cert.recipient_name().to_string(),
            course_name: cert.course_name().to_string(),
            institution_name: cert.institution_name().to_string(),
            metadata_uri: cert.metadata_uri().to_string(),
            issue_date: cert.issue_date().to_iso8601(),
            is_valid: cert.is_valid(),
            digest: digest.to_string(),
        })
    }
}

/// Result of a validity check.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    pub id: u64,
    /// `true` only for an existing, unrevoked certificate.
    pub valid: bool,
}

/// Request body for a certificate transfer.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
}

/// Request body for a single-certificate approval.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApproveRequest {
    pub approved: String,
}

/// Request body for an operator approval.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OperatorApprovalRequest {
    pub operator: String,
    pub approved: bool,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the certificates router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/certificates", post(issue_certificate))
        .route("/v1/certificates/{id}", get(get_certificate))
        .route("/v1/certificates/{id}/verify", get(verify_certificate))
        .route("/v1/certificates/{id}/revoke", post(revoke_certificate))
        .route("/v1/certificates/{id}/transfer", post(transfer_certificate))
        .route("/v1/certificates/{id}/approve", post(approve_certificate))
        .route("/v1/approvals", post(set_approval_for_all))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/certificates: Issue a certificate to a recipient.
#[utoipa::path(
    post,
    path = "/v1/certificates",
    request_body = IssueCertificateRequest,
    responses(
        (status = 201, description = "Certificate issued", body = CertificateResponse),
        (status = 403, description = "Caller may not issue", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid recipient or oversized field", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub async fn issue_certificate(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<IssueCertificateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CertificateResponse>), AppError> {
    let may_issue = state.read(|r| r.is_authorized_issuer(caller.account()));
    if !may_issue {
        return Err(RegistryError::UnauthorizedIssuer { caller: caller.0 }.into());
    }

    let req = extract_validated_json(body)?;
    let recipient = parse_account("recipient", &req.recipient)?;
    let details = CertificateDetails {
        recipient_name: req.recipient_name,
        course_name: req.course_name,
        institution_name: req.institution_name,
        metadata_uri: req.metadata_uri,
    };

    let id = state.mutate(|r| r.issue(caller.account(), &recipient, details))?;
    let response = state.read(|r| CertificateResponse::from_certificate(r.get(id)?))?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /v1/certificates/{id}: Certificate record with digest.
#[utoipa::path(
    get,
    path = "/v1/certificates/{id}",
    params(("id" = u64, Path, description = "Certificate id")),
    responses(
        (status = 200, description = "Certificate found", body = CertificateResponse),
        (status = 404, description = "No such certificate", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub async fn get_certificate(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<CertificateResponse>, AppError> {
    let id = extract_certificate_id(id)?;
    let response = state.read(|r| CertificateResponse::from_certificate(r.get(id)?))?;
    Ok(Json(response))
}

/// GET /v1/certificates/{id}/verify: Public validity check.
///
/// Never fails for a well-formed id: unknown certificates are simply not valid.
#[utoipa::path(
    get,
    path = "/v1/certificates/{id}/verify",
    params(("id" = u64, Path, description = "Certificate id")),
    responses(
        (status = 200, description = "Validity", body = VerifyResponse),
    ),
    tag = "certificates"
)]
pub async fn verify_certificate(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let id = extract_certificate_id(id)?;
    let valid = state.read(|r| r.verify(id));
    Ok(Json(VerifyResponse {
        id: id.value(),
        valid,
    }))
}

/// POST /v1/certificates/{id}/revoke: Revoke a certificate.
#[utoipa::path(
    post,
    path = "/v1/certificates/{id}/revoke",
    params(("id" = u64, Path, description = "Certificate id")),
    responses(
        (status = 200, description = "Certificate revoked", body = CertificateResponse),
        (status = 403, description = "Caller is neither owner nor issuer of record", body = crate::error::ErrorBody),
        (status = 404, description = "No such certificate", body = crate::error::ErrorBody),
        (status = 409, description = "Already revoked", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub async fn revoke_certificate(
    State(state): State<AppState>,
    caller: Caller,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<CertificateResponse>, AppError> {
    let id = extract_certificate_id(id)?;
    state.mutate(|r| r.revoke(caller.account(), id))?;
    let response = state.read(|r| CertificateResponse::from_certificate(r.get(id)?))?;
    Ok(Json(response))
}

/// POST /v1/certificates/{id}/transfer: Rejected: certificates are soulbound.
#[utoipa::path(
    post,
    path = "/v1/certificates/{id}/transfer",
    params(("id" = u64, Path, description = "Certificate id")),
    request_body = TransferRequest,
    responses(
        (status = 403, description = "Transfers are permanently disabled", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub async fn transfer_certificate(
    State(state): State<AppState>,
    caller: Option<Caller>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let id = lenient_id(id);
    let (from, to) = match extract_json(body) {
        Ok(req) => (lenient_account(&req.from), lenient_account(&req.to)),
        Err(_) => (AccountId::ZERO, AccountId::ZERO),
    };
    state.read(|r| r.transfer_from(&lenient_caller(caller), &from, &to, id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/certificates/{id}/approve: Rejected: certificates are soulbound.
#[utoipa::path(
    post,
    path = "/v1/certificates/{id}/approve",
    params(("id" = u64, Path, description = "Certificate id")),
    request_body = ApproveRequest,
    responses(
        (status = 403, description = "Approvals are permanently disabled", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub async fn approve_certificate(
    State(state): State<AppState>,
    caller: Option<Caller>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<ApproveRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let id = lenient_id(id);
    let approved = extract_json(body)
        .map(|req| lenient_account(&req.approved))
        .unwrap_or(AccountId::ZERO);
    state.read(|r| r.approve(&lenient_caller(caller), &approved, id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/approvals: Rejected: certificates are soulbound.
#[utoipa::path(
    post,
    path = "/v1/approvals",
    request_body = OperatorApprovalRequest,
    responses(
        (status = 403, description = "Operator approvals are permanently disabled", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub async fn set_approval_for_all(
    State(state): State<AppState>,
    caller: Option<Caller>,
    body: Result<Json<OperatorApprovalRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let (operator, approved) = extract_json(body)
        .map(|req| (lenient_account(&req.operator), req.approved))
        .unwrap_or((AccountId::ZERO, false));
    state.read(|r| r.set_approval_for_all(&lenient_caller(caller), &operator, approved))?;
    Ok(StatusCode::NO_CONTENT)
}

// Transfer-style requests are refused whatever they contain, so malformed
// input or an anonymous caller must not turn the 403 into a 400 or 401.

fn lenient_caller(caller: Option<Caller>) -> AccountId {
    caller.map_or(AccountId::ZERO, |c| c.0)
}

fn lenient_id(id: Result<Path<u64>, PathRejection>) -> CertificateId {
    id.map(|Path(id)| CertificateId::new(id))
        .unwrap_or(CertificateId::new(0))
}

fn lenient_account(value: &str) -> AccountId {
    AccountId::parse(value).unwrap_or(AccountId::ZERO)
}

