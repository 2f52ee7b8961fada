//! Web server command.

use anyhow::Context;
use console::style;

use super::helpers::open_store;
use crate::config::{ServerSettings, Settings};
use crate::llm::build_provider;
use crate::server::{self, AppState};

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: Option<&str>) -> anyhow::Result<()> {
    let (host, port) = match bind {
        Some(bind) => parse_bind_address(bind, &settings.server)?,
        None => (settings.server.host.clone(), settings.server.port),
    };

    println!(
        "{} Connecting to database at {}...",
        style("→").cyan(),
        settings.database.display_url()
    );
    let store = open_store(settings).await?;

    let provider = build_provider(&settings.llm).context("Failed to set up analysis provider")?;
    println!(
        "  {} Analysis provider: {}",
        style("✓").green(),
        provider.name()
    );

    println!(
        "{} Starting server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    server::serve(AppState::new(provider, store), &format!("{}:{}", host, port)).await
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> default host, port 3030
/// - Just a host: "127.0.0.1" -> 127.0.0.1, default port
/// - Host and port: "0.0.0.0:3030"
fn parse_bind_address(bind: &str, defaults: &ServerSettings) -> anyhow::Result<(String, u16)> {
    if let Ok(port) = bind.parse::<u16>() {
        return Ok((defaults.host.clone(), port));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        let port = port_str
            .parse::<u16>()
            .with_context(|| format!("Invalid port in bind address: {}", bind))?;
        return Ok((host.to_string(), port));
    }

    Ok((bind.to_string(), defaults.port))
}
