//! Search command.

use super::helpers::{open_store, print_json};
use crate::config::Settings;
use crate::services::SearchService;

pub async fn cmd_search(settings: &Settings, term: &str) -> anyhow::Result<()> {
    let store = open_store(settings).await?;
    let results = SearchService::new(store).search(term).await?;
    print_json(&results)
}
