//! Knowledge Extractor - analyze free text with an LLM and search the
//! results by topic or keyword.
//!
//! Analyses are stored in PostgreSQL when it is reachable and in a local
//! SQLite file otherwise.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod llm;
pub mod models;
pub mod repository;
pub mod server;
pub mod services;
