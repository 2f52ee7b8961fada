//! Service layer.
//!
//! Orchestrates providers and storage. Used by both the HTTP handlers and
//! the CLI.

pub mod analyze;
pub mod search;

use thiserror::Error;

use crate::llm::LlmError;
use crate::repository::DbError;

pub use analyze::AnalysisService;
pub use search::SearchService;

/// Errors surfaced by services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller supplied unusable input
    #[error("{0}")]
    InvalidInput(String),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] LlmError),

    #[error("Database error: {0}")]
    Persistence(#[from] DbError),
}

impl ServiceError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
