//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/analyze",
            post(handlers::analyze).fallback(handlers::method_not_allowed),
        )
        .route(
            "/search",
            get(handlers::search).fallback(handlers::method_not_allowed),
        )
        .route("/analyses/:id", get(handlers::get_analysis))
        .route("/health", get(handlers::health))
        .route("/api/openapi.json", get(handlers::openapi_spec))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
