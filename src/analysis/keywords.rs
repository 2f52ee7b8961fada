//! Keyword extraction by term frequency.
//!
//! Used to fill keywords (and topics, when the remote provider returns
//! unstructured text) without another model round-trip.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Return the `top_n` most frequent words in `text`, lowercased.
///
/// Ties are broken by first occurrence so the output is stable across runs.
pub fn extract_top_keywords(text: &str, top_n: usize) -> Vec<String> {
    let normalized = text.to_lowercase();

    // word -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, m) in WORD.find_iter(&normalized).enumerate() {
        counts.entry(m.as_str()).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(top_n)
        .map(|(word, _, _)| word.to_string())
        .collect()
}
