//! # Issuer Allow-List Endpoints
//!
//! - `GET    /v1/issuers`: The explicit allow-list.
//! - `PUT    /v1/issuers/{account}`: Authorize an issuer (owner only).
//! - `DELETE /v1/issuers/{account}`: Deauthorize an issuer (owner only).
//!
//! Both mutations are idempotent.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::parse_account;
use crate::state::AppState;

/// The issuer allow-list. The owner may always issue and is listed
/// separately.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssuerList {
    pub owner: String,
    /// Sorted account list.
    pub issuers: Vec<String>,
}

/// Issuer status after a change.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssuerStatus {
    pub account: String,
    pub authorized: bool,
}

/// Build the issuers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/issuers", get(list_issuers))
        .route(
            "/v1/issuers/{account}",
            axum::routing::put(authorize_issuer).delete(revoke_issuer),
        )
}

/// GET /v1/issuers: List authorized issuers.
#[utoipa::path(
    get,
    path = "/v1/issuers",
    responses((status = 200, description = "Issuer allow-list", body = IssuerList)),
    tag = "issuers"
)]
pub async fn list_issuers(State(state): State<AppState>) -> Json<IssuerList> {
    Json(state.read(|r| IssuerList {
        owner: r.owner().to_string(),
        issuers: r
            .authorized_issuers()
            .iter()
            .map(ToString::to_string)
            .collect(),
    }))
}

/// PUT /v1/issuers/{account}: Authorize an issuer.
#[utoipa::path(
    put,
    path = "/v1/issuers/{account}",
    params(("account" = String, Path, description = "Issuer account (0x-prefixed hex)")),
    responses(
        (status = 200, description = "Issuer authorized", body = IssuerStatus),
        (status = 403, description = "Caller is not the owner", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid account", body = crate::error::ErrorBody),
    ),
    tag = "issuers"
)]
pub async fn authorize_issuer(
    State(state): State<AppState>,
    caller: Caller,
    Path(account): Path<String>,
) -> Result<Json<IssuerStatus>, AppError> {
    let account = parse_account("account", &account)?;
    state.mutate(|r| r.authorize_issuer(caller.account(), &account))?;
    Ok(Json(IssuerStatus {
        account: account.to_string(),
        authorized: true,
    }))
}

/// DELETE /v1/issuers/{account}: Deauthorize an issuer.
///
/// Certificates the issuer already issued remain valid.
#[utoipa::path(
    delete,
    path = "/v1/issuers/{account}",
    params(("account" = String, Path, description = "Issuer account (0x-prefixed hex)")),
    responses(
        (status = 200, description = "Issuer deauthorized", body = IssuerStatus),
        (status = 403, description = "Caller is not the owner", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid account", body = crate::error::ErrorBody),
    ),
    tag = "issuers"
)]
pub async fn revoke_issuer(
    State(state): State<AppState>,
    caller: Caller,
    Path(account): Path<String>,
) -> Result<Json<IssuerStatus>, AppError> {
    let account = parse_account("account", &account)?;
    state.mutate(|r| r.revoke_issuer(caller.account(), &account))?;
    Ok(Json(IssuerStatus {
        account: account.to_string(),
        authorized: false,
    }))
}
