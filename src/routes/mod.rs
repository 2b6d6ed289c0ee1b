pub mod api;

use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::state::AppState;
use crate::websocket::handler::websocket_handler;
use api::create_api_routes;

/// Build the full application: API under `/api`, Swagger UI, and the
/// websocket endpoint on every other path.
pub fn create_app(app_state: Arc<AppState>) -> Router {
    let cors = cors_layer(&app_state.config.cors_origin_list());

    Router::new()
        // Mount API routes
        .nest("/api", create_api_routes())
        // Everything else is the signaling socket
        .fallback(websocket_handler)
        .with_state(app_state)
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        // Add tracing layer
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();
    CorsLayer::new().allow_origin(allowed).allow_methods(Any).allow_headers(Any)
}
