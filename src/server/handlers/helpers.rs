//! Error responses shared by handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::services::ServiceError;

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

pub fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            return api_error(StatusCode::BAD_REQUEST, self.to_string());
        }
        error!("Request failed: {}", self);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
    }
}

/// Response for a request task that panicked or was cancelled.
pub fn task_failed(e: tokio::task::JoinError) -> Response {
    error!("Request task failed: {}", e);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}

/// Fallback for a known path hit with the wrong method.
pub async fn method_not_allowed() -> Response {
    api_error(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    api_error(StatusCode::NOT_FOUND, "not found")
}
