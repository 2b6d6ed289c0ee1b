use axum::{Json, http::StatusCode};
use crate::models::HealthResponse;
use tracing::debug;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
    })
}

/// Readiness check endpoint
pub async fn ready_check() -> Json<HealthResponse> {
    debug!("Readiness check requested");
    // Nothing to wait on: all state is in memory.
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Service is ready".to_string(),
    })
}

/// Plain-text answer for non-websocket requests on the signaling port
pub async fn plain_health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "okay")
}
