//! # Account Endpoint
//!
//! `GET /v1/accounts/{account}`: what the registry knows about one account.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::parse_account;
use crate::state::AppState;

/// Certificates held and issued by an account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountSummary {
    pub account: String,
    /// Certificates held, revoked ones included.
    pub balance: usize,
    /// Ids held, in issuance order.
    pub held: Vec<u64>,
    /// Ids issued, in issuance order.
    pub issued: Vec<u64>,
    /// Whether the account may currently issue.
    pub is_authorized_issuer: bool,
    pub is_owner: bool,
}

/// Build the accounts router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/accounts/{account}", get(get_account))
}

/// GET /v1/accounts/{account}: Holdings and issuer status.
#[utoipa::path(
    get,
    path = "/v1/accounts/{account}",
    params(("account" = String, Path, description = "Account (0x-prefixed hex)")),
    responses(
        (status = 200, description = "Account summary", body = AccountSummary),
        (status = 422, description = "Invalid or null account", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Result<Json<AccountSummary>, AppError> {
    let account = parse_account("account", &account)?;
    let summary = state.read(|r| -> Result<AccountSummary, AppError> {
        Ok(AccountSummary {
            account: account.to_string(),
            balance: r.balance_of(&account)?,
            held: ids(r.certificates_by_recipient(&account)),
            issued: ids(r.certificates_by_issuer(&account)),
            is_authorized_issuer: r.is_authorized_issuer(&account),
            is_owner: r.owner() == account,
        })
    })?;
    Ok(Json(summary))
}

fn ids(list: &[verifycert_core::CertificateId]) -> Vec<u64> {
    list.iter().map(|id| id.value()).collect()
}
