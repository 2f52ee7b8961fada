//! One-shot analysis command.

use anyhow::Context;

use super::helpers::{open_store, print_json};
use crate::config::Settings;
use crate::llm::build_provider;
use crate::services::AnalysisService;

/// Analyze `text`, store it, and print the record.
pub async fn cmd_analyze(settings: &Settings, text: &str) -> anyhow::Result<()> {
    let store = open_store(settings).await?;
    let provider = build_provider(&settings.llm).context("Failed to set up analysis provider")?;

    let analysis = AnalysisService::new(provider, store).analyze(text).await?;
    print_json(&analysis)
}
