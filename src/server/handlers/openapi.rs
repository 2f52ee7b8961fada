//! OpenAPI document.

use axum::{http::StatusCode, response::IntoResponse};
use utoipa::OpenApi;

use super::{analyze, health, helpers, search};
use crate::models::Analysis;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Knowledge Extractor API",
        description = "Text analysis and topic search"
    ),
    paths(
        analyze::analyze,
        analyze::get_analysis,
        search::search,
        health::health,
    ),
    components(schemas(
        Analysis,
        analyze::AnalyzeRequest,
        helpers::ErrorBody,
        health::HealthResponse,
    )),
    tags(
        (name = "Analysis", description = "Analyze and store text"),
        (name = "Search", description = "Topic and keyword search"),
        (name = "Health", description = "Health check"),
    )
)]
struct ApiDoc;

/// Serve the OpenAPI spec as JSON.
pub async fn openapi_spec() -> impl IntoResponse {
    let spec = ApiDoc::openapi()
        .to_json()
        .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e));
    (StatusCode::OK, [("content-type", "application/json")], spec)
}
