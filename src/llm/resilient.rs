//! Primary/fallback provider chain.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{AnalysisProvider, LlmError};
use crate::models::AnalysisResult;

/// Tries `primary`; on any error logs it and returns whatever `fallback`
/// returns. Holds no state between calls, so every call tries the
/// primary again.
pub struct ResilientProvider {
    primary: Arc<dyn AnalysisProvider>,
    fallback: Arc<dyn AnalysisProvider>,
}

impl ResilientProvider {
    pub fn new(primary: Arc<dyn AnalysisProvider>, fallback: Arc<dyn AnalysisProvider>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl AnalysisProvider for ResilientProvider {
    fn name(&self) -> &str {
        "resilient"
    }

    async fn analyze(&self, text: &str) -> Result<AnalysisResult, LlmError> {
        match self.primary.analyze(text).await {
            Ok(result) => {
                debug!("Analysis served by {}", self.primary.name());
                Ok(result)
            }
            Err(e) => {
                warn!(
                    "{} provider failed, falling back to {}: {}",
                    self.primary.name(),
                    self.fallback.name(),
                    e
                );
                self.fallback.analyze(text).await
            }
        }
    }
}
