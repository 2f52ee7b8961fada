//! LLM client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{parse_flag, EnvLookup};

/// Configuration for the analysis provider stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Force the deterministic stub provider
    #[serde(default)]
    pub use_mock: bool,
    /// Wrap the remote provider with a stub fallback
    #[serde(default = "default_fallback")]
    pub fallback: bool,
    /// API endpoint (base URL, without `/v1/responses`)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Bearer credential for the remote service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model named in the request payload
    #[serde(default = "default_model")]
    pub model: String,
    /// Timeout for a single outbound call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum bytes of input text sent to the model
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

fn default_fallback() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-5-nano".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_content_chars() -> usize {
    12000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            use_mock: false,
            fallback: default_fallback(),
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            max_content_chars: default_max_content_chars(),
        }
    }
}

impl LlmConfig {
    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `USE_MOCK_LLM`: "true" or "1" forces the stub provider
    /// - `LLM_FALLBACK`: "false" or "0" disables the stub fallback
    /// - `LLM_ENDPOINT`: API base URL
    /// - `LLM_API_KEY`: API key (wins over `OPENAI_API_KEY`)
    /// - `OPENAI_API_KEY`: API key
    /// - `LLM_MODEL`: Model name
    /// - `LLM_TIMEOUT_SECS`: Per-call timeout
    /// - `LLM_MAX_CONTENT_CHARS`: Max input bytes to send
    pub fn with_overrides(mut self, env: &EnvLookup) -> Self {
        if let Some(val) = env("USE_MOCK_LLM") {
            self.use_mock = parse_flag(&val).unwrap_or(self.use_mock);
        }
        if let Some(val) = env("LLM_FALLBACK") {
            self.fallback = parse_flag(&val).unwrap_or(self.fallback);
        }
        if let Some(val) = env("LLM_ENDPOINT") {
            self.endpoint = val.trim_end_matches('/').to_string();
        }
        if let Some(key) = env("LLM_API_KEY").or_else(|| env("OPENAI_API_KEY")) {
            if !key.trim().is_empty() {
                self.api_key = Some(key.trim().to_string());
            }
        }
        if let Some(val) = env("LLM_MODEL") {
            self.model = val;
        }
        if let Some(n) = env("LLM_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = n;
        }
        if let Some(n) = env("LLM_MAX_CONTENT_CHARS").and_then(|v| v.parse().ok()) {
            self.max_content_chars = n;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether the remote provider can be used at all.
    pub fn remote_enabled(&self) -> bool {
        !self.use_mock && self.api_key.is_some()
    }

    /// Human-readable reason the remote provider is not in use.
    pub fn stub_reason(&self) -> &'static str {
        if self.use_mock {
            "USE_MOCK_LLM is set"
        } else {
            "no API key configured (set OPENAI_API_KEY or LLM_API_KEY)"
        }
    }
}
