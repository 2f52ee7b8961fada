//! Deterministic offline provider.

use async_trait::async_trait;

use super::{AnalysisProvider, LlmError};
use crate::models::AnalysisResult;

/// Returns the same canned result for every input. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubProvider;

impl StubProvider {
    pub fn canned() -> AnalysisResult {
        AnalysisResult {
            summary: "mock summary".to_string(),
            title: "mock title".to_string(),
            topics: vec!["mock".to_string(), "topic".to_string()],
            sentiment: "neutral".to_string(),
            keywords: vec!["keyword".to_string()],
            confidence: 0.99,
        }
    }
}

#[async_trait]
impl AnalysisProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn analyze(&self, _text: &str) -> Result<AnalysisResult, LlmError> {
        Ok(Self::canned())
    }
}
