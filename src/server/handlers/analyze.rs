//! Analysis endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::super::AppState;
use super::helpers::{api_error, task_failed};

/// Request body for `POST /analyze`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Text to analyze; must not be empty.
    pub text: String,
}

/// Analyze text and store the result.
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Stored analysis", body = crate::models::Analysis),
        (status = 400, description = "Malformed body or empty text", body = super::helpers::ErrorBody),
        (status = 500, description = "Provider or database failure", body = super::helpers::ErrorBody)
    ),
    tag = "Analysis"
)]
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return api_error(
                StatusCode::BAD_REQUEST,
                format!("invalid request body: {}", rejection.body_text()),
            )
        }
    };

    // Spawned so a client disconnect cannot cancel the provider call or the insert.
    let service = state.analysis.clone();
    let task = tokio::spawn(async move { service.analyze(&request.text).await });

    match task.await {
        Ok(Ok(analysis)) => Json(analysis).into_response(),
        Ok(Err(e)) => e.into_response(),
        Err(e) => task_failed(e),
    }
}

/// Fetch one stored analysis.
#[utoipa::path(
    get,
    path = "/analyses/{id}",
    params(("id" = String, Path, description = "Analysis id")),
    responses(
        (status = 200, description = "Stored analysis", body = crate::models::Analysis),
        (status = 404, description = "Unknown id", body = super::helpers::ErrorBody),
        (status = 500, description = "Database failure", body = super::helpers::ErrorBody)
    ),
    tag = "Analysis"
)]
pub async fn get_analysis(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.analysis.get(&id).await {
        Ok(Some(analysis)) => Json(analysis).into_response(),
        Ok(None) => api_error(StatusCode::NOT_FOUND, format!("analysis {} not found", id)),
        Err(e) => e.into_response(),
    }
}
