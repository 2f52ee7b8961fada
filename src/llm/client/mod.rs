//! Remote analysis provider.
//!
//! Talks to an OpenAI-style Responses API (`POST /v1/responses`) and turns
//! the generated text into an [`AnalysisResult`].

mod config;
mod prompts;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use config::LlmConfig;

use super::{AnalysisProvider, LlmError};
use crate::analysis::extract_top_keywords;
use crate::models::{AnalysisResult, Sentiment};

/// Title used when the model doesn't supply one.
pub const GENERATED_TITLE: &str = "Generated Title";

/// Confidence reported when the model doesn't supply one.
pub const DEFAULT_CONFIDENCE: f64 = 0.9;

/// How many locally extracted terms fill a missing topic/keyword list.
const LOCAL_TERM_COUNT: usize = 3;

/// Responses API request format.
#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: String,
    store: bool,
}

/// Responses API response format (only the parts we read).
#[derive(Debug, Deserialize)]
struct ResponsesReply {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesReply {
    /// First non-empty text part. Reasoning items carry no content and are
    /// skipped.
    fn first_text(self) -> Option<String> {
        self.output
            .into_iter()
            .flat_map(|item| item.content)
            .filter_map(|part| part.text)
            .find(|text| !text.trim().is_empty())
    }
}

/// Analysis object the prompt asks the model to produce.
#[derive(Debug, Deserialize)]
struct ModelAnalysis {
    summary: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    sentiment: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Provider backed by a remote model.
pub struct RemoteProvider {
    config: LlmConfig,
    client: Client,
}

impl RemoteProvider {
    /// Create a new provider. Fails if no API key is configured.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if config.api_key.is_none() {
            return Err(LlmError::MissingApiKey);
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Truncate content to configured maximum (UTF-8 safe).
    fn truncate_content<'a>(&self, text: &'a str) -> &'a str {
        if text.len() <= self.config.max_content_chars {
            return text;
        }
        let mut end = self.config.max_content_chars;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        &text[..end]
    }

    /// Call the Responses API and return the generated text.
    async fn call_responses(&self, prompt: String) -> Result<String, LlmError> {
        let request = ResponsesRequest {
            model: &self.config.model,
            input: prompt,
            store: false,
        };

        let url = format!("{}/v1/responses", self.config.endpoint);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.as_deref().unwrap_or_default())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        let reply: ResponsesReply = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.config.timeout_secs)
            } else {
                LlmError::Parse(e.to_string())
            }
        })?;

        reply.first_text().ok_or(LlmError::EmptyResponse)
    }

    fn transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.config.timeout_secs)
        } else {
            LlmError::Connection(e.to_string())
        }
    }
}

#[async_trait]
impl AnalysisProvider for RemoteProvider {
    fn name(&self) -> &str {
        "remote"
    }

    async fn analyze(&self, text: &str) -> Result<AnalysisResult, LlmError> {
        let content = self.truncate_content(text);
        if content.len() < text.len() {
            debug!(
                "Truncated input from {} to {} bytes",
                text.len(),
                content.len()
            );
        }

        let output = self.call_responses(prompts::analysis_prompt(content)).await?;
        let result = parse_analysis(&output, text);
        info!(
            "Remote analysis complete: \"{}\" ({} topics, {} keywords)",
            result.title,
            result.topics.len(),
            result.keywords.len()
        );
        Ok(result)
    }
}

/// Strip a surrounding Markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Turn model output into a complete result.
///
/// A JSON analysis object is used field by field, with gaps filled from
/// `source`. Anything else is kept verbatim as the summary.
fn parse_analysis(output: &str, source: &str) -> AnalysisResult {
    let local_terms = || extract_top_keywords(source, LOCAL_TERM_COUNT);

    match serde_json::from_str::<ModelAnalysis>(strip_code_fence(output)) {
        Ok(parsed) => {
            let title = parsed.title.trim();
            AnalysisResult {
                summary: parsed.summary.trim().to_string(),
                title: if title.is_empty() {
                    GENERATED_TITLE.to_string()
                } else {
                    title.to_string()
                },
                topics: non_empty_or(parsed.topics, local_terms),
                sentiment: Sentiment::normalize(&parsed.sentiment).as_str().to_string(),
                keywords: non_empty_or(parsed.keywords, local_terms),
                confidence: clamp_confidence(parsed.confidence),
            }
        }
        Err(e) => {
            debug!("Model output is not an analysis object ({}), using it as summary", e);
            let terms = local_terms();
            AnalysisResult {
                summary: output.trim().to_string(),
                title: GENERATED_TITLE.to_string(),
                topics: terms.clone(),
                sentiment: Sentiment::Neutral.as_str().to_string(),
                keywords: terms,
                confidence: DEFAULT_CONFIDENCE,
            }
        }
    }
}

fn non_empty_or(values: Vec<String>, fill: impl Fn() -> Vec<String>) -> Vec<String> {
    let values: Vec<String> = values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    if values.is_empty() {
        fill()
    } else {
        values
    }
}

fn clamp_confidence(value: Option<f64>) -> f64 {
    match value {
        Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
        _ => DEFAULT_CONFIDENCE,
    }
}
