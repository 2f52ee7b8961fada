//! Topic/keyword search.

use std::sync::Arc;

use tracing::debug;

use super::ServiceError;
use crate::models::Analysis;
use crate::repository::AnalysisStore;

#[derive(Clone)]
pub struct SearchService {
    store: Arc<dyn AnalysisStore>,
}

impl SearchService {
    pub fn new(store: Arc<dyn AnalysisStore>) -> Self {
        Self { store }
    }

    /// Analyses tagged with `term` as a topic or keyword, newest first.
    /// The term is trimmed; a blank term is rejected.
    pub async fn search(&self, term: &str) -> Result<Vec<Analysis>, ServiceError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ServiceError::InvalidInput("topic is required".to_string()));
        }

        let results = self.store.search(term).await?;
        debug!("Search '{}' returned {} analyses", term, results.len());
        Ok(results)
    }
}
