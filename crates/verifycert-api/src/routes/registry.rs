//! # Registry Endpoints
//!
//! - `GET /v1/registry`: Owner, supply and id counter.
//! - `PUT /v1/registry/owner`: Hand registry ownership to another account.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use verifycert_registry::CertificateRegistry;

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::{extract_json, parse_account};
use crate::state::AppState;

/// Registry summary.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistryInfo {
    pub owner: String,
    /// Certificates ever issued, revoked ones included.
    pub total_supply: usize,
    /// The id the next issuance will receive.
    pub next_id: u64,
    /// Size of the explicit issuer allow-list.
    pub authorized_issuers: usize,
    /// Number of journal entries.
    pub events: usize,
}

impl RegistryInfo {
    fn of(registry: &CertificateRegistry) -> Self {
        Self {
            owner: registry.owner().to_string(),
            total_supply: registry.total_supply(),
            next_id: registry.next_id().value(),
            authorized_issuers: registry.authorized_issuers().len(),
            events: registry.events().len(),
        }
    }
}

/// Request body for an ownership transfer.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferOwnershipRequest {
    pub new_owner: String,
}

/// Build the registry router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/registry", get(registry_info))
        .route("/v1/registry/owner", put(transfer_ownership))
}

/// GET /v1/registry: Registry summary.
#[utoipa::path(
    get,
    path = "/v1/registry",
    responses((status = 200, description = "Registry summary", body = RegistryInfo)),
    tag = "registry"
)]
pub async fn registry_info(State(state): State<AppState>) -> Json<RegistryInfo> {
    Json(state.read(RegistryInfo::of))
}

/// PUT /v1/registry/owner: Transfer registry ownership. Owner only.
#[utoipa::path(
    put,
    path = "/v1/registry/owner",
    request_body = TransferOwnershipRequest,
    responses(
        (status = 200, description = "Ownership transferred", body = RegistryInfo),
        (status = 403, description = "Caller is not the owner", body = crate::error::ErrorBody),
        (status = 422, description = "New owner is invalid", body = crate::error::ErrorBody),
    ),
    tag = "registry"
)]
pub async fn transfer_ownership(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<TransferOwnershipRequest>, JsonRejection>,
) -> Result<Json<RegistryInfo>, AppError> {
    let req = extract_json(body)?;
    let new_owner = parse_account("new_owner", &req.new_owner)?;
    state.mutate(|r| r.transfer_ownership(caller.account(), &new_owner))?;
    Ok(Json(state.read(RegistryInfo::of)))
}
