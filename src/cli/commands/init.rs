//! Database initialization command.

use console::style;

use super::helpers::open_store;
use crate::config::Settings;

/// Create the analyses table on the configured backend.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    println!(
        "{} Initializing database at {}",
        style("→").cyan(),
        settings.database.display_url()
    );
    open_store(settings).await?;
    Ok(())
}
