//! # verifycert-api: HTTP Service for the Certificate Registry
//!
//! Exposes a single [`CertificateRegistry`](verifycert_registry::CertificateRegistry)
//! over HTTP. The calling account is resolved from the bearer token and
//! passed explicitly to every registry operation.
//!
//! ## API Surface
//!
//! | Prefix                 | Module                     | Domain                 |
//! |------------------------|----------------------------|------------------------|
//! | `/v1/registry*`        | [`routes::registry`]       | Ownership, summary     |
//! | `/v1/certificates/*`   | [`routes::certificates`]   | Certificate lifecycle  |
//! | `/v1/approvals`        | [`routes::certificates`]   | Always refused         |
//! | `/v1/accounts/*`       | [`routes::accounts`]       | Holdings               |
//! | `/v1/issuers/*`        | [`routes::issuers`]        | Issuer allow-list      |
//! | `/v1/events*`          | [`routes::events`]         | Event journal          |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Generated via utoipa derive macros and served at `/openapi.json`.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState};

use crate::auth::AuthConfig;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the auth middleware
/// so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::registry::router())
        .merge(routes::certificates::router())
        .merge(routes::accounts::router())
        .merge(routes::issuers::router())
        .merge(routes::events::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: the registry is loaded before the listener binds.
async fn readiness() -> &'static str {
    "ready"
}
