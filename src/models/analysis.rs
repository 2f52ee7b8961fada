//! Analysis models.
//!
//! An `AnalysisResult` is what a provider hands back; an `Analysis` is the
//! persisted record built from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Overall tone of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }

    /// Map free text onto the closed set, treating anything unknown as neutral.
    pub fn normalize(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

/// Structured output of a provider call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// One or two sentence summary.
    pub summary: String,
    /// Extracted or generated title.
    pub title: String,
    /// Key topics, three intended.
    pub topics: Vec<String>,
    /// positive / neutral / negative, stored as free text.
    pub sentiment: String,
    /// Most frequent terms.
    pub keywords: Vec<String>,
    /// Confidence score, nominally in [0, 1].
    pub confidence: f64,
}

/// A persisted analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Analysis {
    pub id: String,
    pub raw_text: String,
    pub summary: String,
    pub title: String,
    pub topics: Vec<String>,
    pub sentiment: String,
    pub keywords: Vec<String>,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

/// An analysis ready to be written. `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalysis {
    pub id: String,
    pub raw_text: String,
    pub summary: String,
    pub title: String,
    pub topics: Vec<String>,
    pub sentiment: String,
    pub keywords: Vec<String>,
    pub confidence: f64,
}

impl NewAnalysis {
    /// Build a record from a provider result, assigning a fresh id.
    ///
    /// Topic and keyword tokens are trimmed and blank ones dropped, so every
    /// backend stores and returns the same lists.
    pub fn from_result(raw_text: &str, result: AnalysisResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            raw_text: raw_text.to_string(),
            summary: result.summary,
            title: result.title,
            topics: clean_tokens(result.topics),
            sentiment: result.sentiment,
            keywords: clean_tokens(result.keywords),
            confidence: result.confidence,
        }
    }

    /// Attach the server-assigned timestamp.
    pub fn into_analysis(self, created_at: DateTime<Utc>) -> Analysis {
        Analysis {
            id: self.id,
            raw_text: self.raw_text,
            summary: self.summary,
            title: self.title,
            topics: self.topics,
            sentiment: self.sentiment,
            keywords: self.keywords,
            confidence: self.confidence,
            created_at,
        }
    }
}

fn clean_tokens(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
