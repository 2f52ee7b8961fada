//! Shared helper functions for CLI commands.

use std::sync::Arc;

use console::style;

use crate::config::Settings;
use crate::repository::{self, AnalysisStore};

/// Connect to the configured store and make sure the schema exists.
pub async fn open_store(settings: &Settings) -> anyhow::Result<Arc<dyn AnalysisStore>> {
    match repository::connect(&settings.database).await {
        Ok(store) => {
            println!(
                "  {} Database ready ({})",
                style("✓").green(),
                store.dialect()
            );
            Ok(store)
        }
        Err(e) => {
            eprintln!("  {} Database setup failed: {}", style("✗").red(), e);
            Err(anyhow::anyhow!("Database setup failed: {}", e))
        }
    }
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
