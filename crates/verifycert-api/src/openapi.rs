//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "VerifyCert API",
        version = "0.1.0",
        description = "Registry of non-transferable academic certificates: issuance by authorized issuers, public verification, one-way revocation, and an auditable event journal.",
        license(name = "MIT OR Apache-2.0")
    ),
    paths(
        // Registry
        crate::routes::registry::registry_info,
        crate::routes::registry::transfer_ownership,
        // Certificates
        crate::routes::certificates::issue_certificate,
        crate::routes::certificates::get_certificate,
        crate::routes::certificates::verify_certificate,
        crate::routes::certificates::revoke_certificate,
        crate::routes::certificates::transfer_certificate,
        crate::routes::certificates::approve_certificate,
        crate::routes::certificates::set_approval_for_all,
        // Accounts
        crate::routes::accounts::get_account,
        // Issuers
        crate::routes::issuers::list_issuers,
        crate::routes::issuers::authorize_issuer,
        crate::routes::issuers::revoke_issuer,
        // Events
        crate::routes::events::list_events,
        crate::routes::events::journal_integrity,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::registry::RegistryInfo,
        crate::routes::registry::TransferOwnershipRequest,
        crate::routes::certificates::IssueCertificateRequest,
        crate::routes::certificates::CertificateResponse,
        crate::routes::certificates::VerifyResponse,
        crate::routes::certificates::TransferRequest,
        crate::routes::certificates::ApproveRequest,
        crate::routes::certificates::OperatorApprovalRequest,
        crate::routes::accounts::AccountSummary,
        crate::routes::issuers::IssuerList,
        crate::routes::issuers::IssuerStatus,
        crate::routes::events::EventsResponse,
        crate::routes::events::IntegrityResponse,
    )),
    tags(
        (name = "registry", description = "Registry ownership and summary"),
        (name = "certificates", description = "Certificate issuance, verification and revocation"),
        (name = "accounts", description = "Per-account holdings"),
        (name = "issuers", description = "Issuer allow-list administration"),
        (name = "events", description = "Hash-chained event journal"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
