//! HTTP API endpoints.

pub mod dashboard;
pub mod exercises;
pub mod habits;
pub mod health;
pub mod progress;
pub mod symptoms;

use axum::Router;

use crate::AppState;

/// Endpoints reachable without a session.
pub fn public_router() -> Router<AppState> {
    health::router()
}

/// Per-user resource endpoints. The caller layers the auth middleware on top.
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .merge(habits::router())
        .merge(symptoms::router())
        .merge(exercises::router())
        .merge(progress::router())
        .merge(dashboard::router())
}
