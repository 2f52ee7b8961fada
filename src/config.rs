//! Application settings loaded from the environment.
//!
//! Every settings struct has a `Default` built from constants and a
//! `with_overrides` that applies variables through an [`EnvLookup`], so
//! parsing can be tested without touching the process environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::llm::LlmConfig;
use crate::repository::util::{is_postgres_url, redact_url_password};

/// Default embedded database file.
pub const DEFAULT_SQLITE_PATH: &str = "knowledge.db";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Variable lookup used by `with_overrides`.
pub type EnvLookup = dyn Fn(&str) -> Option<String>;

/// Lookup backed by the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse a boolean flag ("true"/"1"/"yes" and "false"/"0"/"no").
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSettings {
    /// Networked (`postgres://`) or embedded (`sqlite:`/path) database URL.
    pub database_url: Option<String>,
    /// Embedded database used when no networked backend is reachable.
    pub sqlite_path: PathBuf,
    /// Maximum PostgreSQL pool size.
    pub pool_size: usize,
    /// Bound on the startup liveness check, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            database_url: None,
            sqlite_path: PathBuf::from(DEFAULT_SQLITE_PATH),
            pool_size: 10,
            connect_timeout_secs: 5,
        }
    }
}

impl DatabaseSettings {
    /// Embedded database at an explicit path.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            sqlite_path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_overrides(mut self, env: &EnvLookup) -> Self {
        if let Some(url) = env("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.database_url = Some(url.trim().to_string());
            }
        }
        if let Some(path) = env("SQLITE_PATH") {
            if !path.trim().is_empty() {
                self.sqlite_path = PathBuf::from(path.trim());
            }
        }
        if let Some(n) = env("DB_POOL_SIZE").and_then(|v| v.parse().ok()) {
            self.pool_size = n;
        }
        if let Some(n) = env("DB_CONNECT_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.connect_timeout_secs = n;
        }
        self
    }

    /// Networked database URL, if one is configured.
    pub fn postgres_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .filter(|url| is_postgres_url(url))
    }

    /// Embedded database location: an explicit `sqlite:` URL or path in
    /// `DATABASE_URL` wins over `SQLITE_PATH`.
    pub fn sqlite_url(&self) -> String {
        match self.database_url.as_deref() {
            Some(url) if !is_postgres_url(url) => url.to_string(),
            _ => self.sqlite_path.display().to_string(),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Database URL safe for logs.
    pub fn display_url(&self) -> String {
        match self.database_url.as_deref() {
            Some(url) => redact_url_password(url),
            None => self.sqlite_path.display().to_string(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerSettings {
    pub fn with_overrides(mut self, env: &EnvLookup) -> Self {
        if let Some(host) = env("HOST") {
            if !host.trim().is_empty() {
                self.host = host.trim().to_string();
            }
        }
        if let Some(port) = env("PORT").and_then(|v| v.trim().parse().ok()) {
            self.port = port;
        }
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub llm: LlmConfig,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(&process_env)
    }

    pub fn with_overrides(self, env: &EnvLookup) -> Self {
        Self {
            database: self.database.with_overrides(env),
            server: self.server.with_overrides(env),
            llm: self.llm.with_overrides(env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default().with_overrides(&lookup(&[]));
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.bind_address(), "0.0.0.0:8080");
        assert!(settings.database.database_url.is_none());
        assert_eq!(settings.database.sqlite_url(), "knowledge.db");
        assert!(settings.database.postgres_url().is_none());
    }

    #[test]
    fn test_port_override_and_invalid_port() {
        let settings = Settings::default().with_overrides(&lookup(&[("PORT", "9090")]));
        assert_eq!(settings.server.port, 9090);

        let settings = Settings::default().with_overrides(&lookup(&[("PORT", "http")]));
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_postgres_url_selection() {
        let env = lookup(&[("DATABASE_URL", "postgres://app:secret@db:5432/knowledge")]);
        let settings = Settings::default().with_overrides(&env);
        assert_eq!(
            settings.database.postgres_url(),
            Some("postgres://app:secret@db:5432/knowledge")
        );
        assert_eq!(
            settings.database.display_url(),
            "postgres://app:***@db:5432/knowledge"
        );
        // Fallback file is still the SQLite path
        assert_eq!(settings.database.sqlite_url(), "knowledge.db");
    }

    #[test]
    fn test_sqlite_database_url() {
        let env = lookup(&[
            ("DATABASE_URL", "sqlite:/tmp/other.db"),
            ("SQLITE_PATH", "/tmp/ignored.db"),
        ]);
        let settings = Settings::default().with_overrides(&env);
        assert!(settings.database.postgres_url().is_none());
        assert_eq!(settings.database.sqlite_url(), "sqlite:/tmp/other.db");
    }
}
