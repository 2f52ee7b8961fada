//! Delimited-list codec for backends without an array column type.
//!
//! Format: tokens joined with `,`. Encoding trims every token and drops
//! empty ones; decoding splits on `,`, trims, and drops empty tokens. A
//! token that itself contains `,` cannot be represented and comes back as
//! several tokens.

/// Token separator.
pub const DELIMITER: char = ',';

/// Encode a list of tokens into its stored form.
pub fn encode(values: &[String]) -> String {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode a stored value. `NULL` and empty strings decode to an empty list.
pub fn decode(raw: Option<&str>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(s) => s
            .split(DELIMITER)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

/// Whether a stored value contains `term` as a whole token.
pub fn contains_token(raw: Option<&str>, term: &str) -> bool {
    raw.is_some_and(|s| s.split(DELIMITER).any(|t| t.trim() == term))
}
