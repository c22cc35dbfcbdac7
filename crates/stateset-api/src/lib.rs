//! # stateset-api: Axum API Service for the Stateset Ledger
//!
//! Accounts and agreements live in an in-memory vault. Every mutating
//! endpoint turns the request into a proposed transition, runs it through
//! the contracts in `stateset-contracts`, and commits only if it is
//! accepted. A rejection comes back as 422 with the reason's code.
//!
//! ## API Surface
//!
//! | Prefix                     | Module                    |
//! |----------------------------|---------------------------|
//! | `/v1/accounts/*`           | [`routes::accounts`]      |
//! | `/v1/agreements/*`         | [`routes::agreements`]    |
//! | `/v1/transitions/validate` | [`routes::transitions`]   |
//! | `/v1/parties`              | [`routes::parties`]       |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! Health checks and `/metrics` sit outside the stack.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::middleware::from_fn;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    // Authenticated API routes.
    let api = Router::new()
        .merge(routes::accounts::router())
        .merge(routes::agreements::router())
        .merge(routes::transitions::router())
        .merge(routes::parties::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config));

    // Unauthenticated health checks and scrape endpoint.
    let ops = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(metrics_endpoint));

    Router::new().merge(ops).merge(api).with_state(state)
}

/// Liveness check: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness check: the vault is in memory, so ready as soon as it is up.
async fn readiness() -> &'static str {
    "ready"
}

async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    middleware::metrics::render(state.metrics.as_ref())
}
