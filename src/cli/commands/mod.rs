//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod helpers;
mod init;
mod search;
mod serve;

use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "knowledge-extractor")]
#[command(about = "Analyze text with an LLM and search the results by topic")]
#[command(version)]
pub struct Cli {
    /// Database URL or SQLite path
    #[arg(long, global = true, env = "DATABASE_URL")]
    database: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API (default)
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: HOST:PORT from the environment)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Create the analyses table if it does not exist
    Init,

    /// Analyze text once and print the stored record
    Analyze {
        /// Text to analyze
        text: String,
    },

    /// Search stored analyses by topic or keyword
    Search {
        /// Topic or keyword to match exactly
        term: String,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    if let Some(database) = cli.database {
        settings.database.database_url = Some(database);
    }

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => serve::cmd_serve(&settings, bind.as_deref()).await,
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Analyze { text } => analyze::cmd_analyze(&settings, &text).await,
        Commands::Search { term } => search::cmd_search(&settings, &term).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_is_default() {
        let cli = Cli::try_parse_from(["knowledge-extractor", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_subcommands() {
        let cli =
            Cli::try_parse_from(["knowledge-extractor", "serve", "--bind", "127.0.0.1:9000"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Serve { bind: Some(ref b) }) if b == "127.0.0.1:9000"
        ));

        let cli = Cli::try_parse_from([
            "knowledge-extractor",
            "search",
            "go",
            "--database",
            "/tmp/k.db",
        ])
        .unwrap();
        assert_eq!(cli.database.as_deref(), Some("/tmp/k.db"));
        assert!(matches!(cli.command, Some(Commands::Search { ref term }) if term == "go"));
    }
}
