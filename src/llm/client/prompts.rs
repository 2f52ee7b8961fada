//! Prompt templates.

/// Prompt for a structured analysis. `{content}` is replaced with the input.
pub const ANALYSIS_PROMPT: &str = r#"Analyze this text and return JSON with fields: summary, title, topics, sentiment, keywords, confidence.

- summary: 1-2 sentences
- title: a short title for the text
- topics: 3 key topics, as an array of lowercase strings
- sentiment: one of "positive", "neutral", "negative"
- keywords: the 3 most frequent meaningful nouns, as an array of strings
- confidence: a number between 0 and 1

Respond with ONLY the JSON object.

{content}"#;

pub fn analysis_prompt(content: &str) -> String {
    ANALYSIS_PROMPT.replace("{content}", content)
}
