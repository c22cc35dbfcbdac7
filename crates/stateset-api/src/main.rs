//! # stateset-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Configuration comes from `STATESET_CONFIG`
//! (YAML) and the `PORT`, `AUTH_TOKEN` and `STATESET_LOG_JSON` variables.

use anyhow::Context;
use stateset_api::config::AppConfig;
use stateset_api::middleware::metrics::install_recorder;
use stateset_api::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;

    // Initialize structured tracing.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let metrics = match install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!("Prometheus recorder not installed: {e}. /metrics will return 503.");
            None
        }
    };

    if config.auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN not set; /v1 endpoints are unauthenticated");
    }
    tracing::info!(
        review_precondition = ?config.rules.review_precondition,
        agreement_signers = ?config.rules.agreement_signers,
        "transition rules loaded"
    );

    let port = config.port;
    let app = stateset_api::app(AppState::with_config(config, metrics));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Stateset API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
