//! Local, deterministic text analysis helpers.

pub mod keywords;

pub use keywords::extract_top_keywords;
