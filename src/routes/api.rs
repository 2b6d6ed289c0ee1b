use crate::{handlers::{diagnostics, health_check, ready_check}, state::AppState};
use axum::{http::StatusCode, routing::get, Router};
use std::sync::Arc;

/// Create API routes
pub fn create_api_routes() -> Router<Arc<AppState>> {
    Router::<Arc<AppState>>::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/v1/diagnostics", get(diagnostics))
        // Unknown API paths must not reach the websocket fallback
        .fallback(|| async { StatusCode::NOT_FOUND })
}
