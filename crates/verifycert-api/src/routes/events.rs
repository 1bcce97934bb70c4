//! # Event Journal Endpoints
//!
//! Indexers poll `GET /v1/events?since=N` with the last sequence they have
//! seen and can audit the chain with `GET /v1/events/integrity`.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use verifycert_registry::{ChainIntegrity, JournalEntry};

use crate::error::AppError;
use crate::state::AppState;

/// Query parameters for the event feed.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EventsQuery {
    /// Return entries with a sequence strictly greater than this.
    #[serde(default)]
    pub since: u64,
}

/// A page of journal entries.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventsResponse {
    /// Entries in commit order.
    #[schema(value_type = Vec<Object>)]
    pub entries: Vec<JournalEntry>,
    /// Sequence number of the latest entry (0 when empty).
    pub head_sequence: u64,
    /// Hash of the latest entry.
    pub head_hash: String,
}

/// Journal chain integrity report.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IntegrityResponse {
    pub total_entries: usize,
    pub broken_links: usize,
    pub valid: bool,
}

impl From<ChainIntegrity> for IntegrityResponse {
    fn from(c: ChainIntegrity) -> Self {
        Self {
            total_entries: c.total_entries,
            broken_links: c.broken_links,
            valid: c.valid,
        }
    }
}

/// Build the events router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/events", get(list_events))
        .route("/v1/events/integrity", get(journal_integrity))
}

/// GET /v1/events: Journal entries after `since`.
#[utoipa::path(
    get,
    path = "/v1/events",
    params(EventsQuery),
    responses(
        (status = 200, description = "Journal entries", body = EventsResponse),
        (status = 400, description = "Malformed query", body = crate::error::ErrorBody),
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let response = state.read(|r| {
        let all = r.events();
        EventsResponse {
            entries: r.events_since(query.since).to_vec(),
            head_sequence: all.last().map_or(0, |e| e.sequence),
            head_hash: all
                .last()
                .map(|e| e.entry_hash.clone())
                .unwrap_or_else(|| verifycert_core::ZERO_HASH_HEX.to_string()),
        }
    });
    Ok(Json(response))
}

/// GET /v1/events/integrity: Recompute the journal hash chain.
#[utoipa::path(
    get,
    path = "/v1/events/integrity",
    responses((status = 200, description = "Integrity report", body = IntegrityResponse)),
    tag = "events"
)]
pub async fn journal_integrity(State(state): State<AppState>) -> Json<IntegrityResponse> {
    Json(state.read(|r| r.verify_journal()).into())
}
