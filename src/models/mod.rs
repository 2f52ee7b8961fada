//! Data models for the knowledge extractor.

mod analysis;

pub use analysis::{Analysis, AnalysisResult, NewAnalysis, Sentiment};
