//! # verifycert-api: Binary Entry Point
//!
//! Loads (or creates) the registry and starts the Axum HTTP server.
//! Binds to `PORT` (default 8080).

use verifycert_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {e}");
        e
    })?;
    if config.auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN not set: running in development mode, bearer tokens are trusted as-is");
    }
    let port = config.port;

    let state = AppState::open(config).map_err(|e| {
        tracing::error!("Registry initialization failed: {e}");
        e
    })?;

    let app = verifycert_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("VerifyCert API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
