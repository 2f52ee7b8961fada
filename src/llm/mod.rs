//! Text analysis providers.
//!
//! Every provider implements [`AnalysisProvider`]. The service only ever
//! holds an `Arc<dyn AnalysisProvider>` built by [`build_provider`], so it
//! cannot tell whether a result came from the remote model or the stub.

mod client;
mod resilient;
mod stub;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

pub use client::{LlmConfig, RemoteProvider};
pub use resilient::ResilientProvider;
pub use stub::StubProvider;

use crate::models::AnalysisResult;

/// Errors that can occur during provider calls.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty response from provider")]
    EmptyResponse,
}

/// Capability to turn free text into an [`AnalysisResult`].
///
/// Callers must not pass empty text. On error no partial result exists.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    async fn analyze(&self, text: &str) -> Result<AnalysisResult, LlmError>;
}

/// Build the provider stack described by `config`.
///
/// - stub only, when `use_mock` is set or no API key is available
/// - remote wrapped with a stub fallback, when `fallback` is on
/// - bare remote otherwise
pub fn build_provider(config: &LlmConfig) -> Result<Arc<dyn AnalysisProvider>, LlmError> {
    if !config.remote_enabled() {
        info!("Using stub analysis provider: {}", config.stub_reason());
        return Ok(Arc::new(StubProvider));
    }

    let remote: Arc<dyn AnalysisProvider> = Arc::new(RemoteProvider::new(config.clone())?);
    if config.fallback {
        info!(
            "Using remote analysis provider ({}) with stub fallback",
            config.model
        );
        Ok(Arc::new(ResilientProvider::new(remote, Arc::new(StubProvider))))
    } else {
        warn!(
            "Using remote analysis provider ({}) without fallback; provider errors will fail requests",
            config.model
        );
        Ok(remote)
    }
}
