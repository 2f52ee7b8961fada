//! Search endpoint.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::super::AppState;
use super::helpers::task_failed;

/// Search parameters.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Topic or keyword to match exactly.
    pub topic: Option<String>,
}

/// Find analyses by topic or keyword.
#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching analyses, newest first", body = Vec<crate::models::Analysis>),
        (status = 400, description = "Missing or blank topic", body = super::helpers::ErrorBody),
        (status = 500, description = "Database failure", body = super::helpers::ErrorBody)
    ),
    tag = "Search"
)]
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let term = params.topic.unwrap_or_default();
    let service = state.search.clone();
    let task = tokio::spawn(async move { service.search(&term).await });

    match task.await {
        Ok(Ok(results)) => Json(results).into_response(),
        Ok(Err(e)) => e.into_response(),
        Err(e) => task_failed(e),
    }
}
