//! Hondana server library.
//!
//! Serves the public bookstore directory (server-rendered pages plus a JSON
//! API) and the admin back-office JSON API from one binary. All persistence
//! is delegated to a hosted PostgREST database service; there is no local
//! database.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`db`] - Hosted database client and per-table repositories
//! - [`routes`] - Public and admin HTTP handlers
//! - [`services`] - Shared-password auth and the signed session cookie
//! - [`error`] - Error taxonomy and the JSON error envelope

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::services::ServeDir;

use state::AppState;

/// Build the application router.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new("crates/server/static"))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Probes the hosted database service before returning OK.
/// Returns 503 Service Unavailable if the service is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.db().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
