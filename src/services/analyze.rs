//! Analyze-and-store pipeline.

use std::sync::Arc;

use tracing::{debug, info};

use super::ServiceError;
use crate::llm::AnalysisProvider;
use crate::models::{Analysis, NewAnalysis};
use crate::repository::AnalysisStore;

/// Runs text through the provider and persists the result.
#[derive(Clone)]
pub struct AnalysisService {
    provider: Arc<dyn AnalysisProvider>,
    store: Arc<dyn AnalysisStore>,
}

impl AnalysisService {
    pub fn new(provider: Arc<dyn AnalysisProvider>, store: Arc<dyn AnalysisStore>) -> Self {
        Self { provider, store }
    }

    /// Analyze `text` and store the result.
    ///
    /// `text` is stored verbatim; only the empty string is rejected.
    /// Provider and storage failures abort the request without retry.
    pub async fn analyze(&self, text: &str) -> Result<Analysis, ServiceError> {
        if text.is_empty() {
            return Err(ServiceError::InvalidInput("text is required".to_string()));
        }

        debug!(
            "Analyzing {} bytes with {} provider",
            text.len(),
            self.provider.name()
        );
        let result = self.provider.analyze(text).await?;

        let record = NewAnalysis::from_result(text, result);
        let analysis = self.store.insert(record).await?;

        info!(
            "Stored analysis {} ({} topics, {} keywords)",
            analysis.id,
            analysis.topics.len(),
            analysis.keywords.len()
        );
        Ok(analysis)
    }

    /// Look up a stored analysis.
    pub async fn get(&self, id: &str) -> Result<Option<Analysis>, ServiceError> {
        Ok(self.store.get(id).await?)
    }

    pub fn store(&self) -> &Arc<dyn AnalysisStore> {
        &self.store
    }
}
