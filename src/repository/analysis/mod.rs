//! Analysis persistence.
//!
//! One logical `analyses` table over two physical dialects. The embedded
//! backend stores list columns through [`codec`](super::codec); the
//! networked backend uses native `TEXT[]` columns. Callers only ever see
//! `Vec<String>`.

mod sqlite;
#[cfg(feature = "postgres")]
mod postgres;

pub use sqlite::SqliteAnalysisStore;
#[cfg(feature = "postgres")]
pub use postgres::PgAnalysisStore;

use async_trait::async_trait;

use super::pool::DbError;
use crate::models::{Analysis, NewAnalysis};

/// Physical storage dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage capability for analyses. Implementations are chosen once at
/// startup and shared behind `Arc<dyn AnalysisStore>`.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Dialect this store speaks.
    fn dialect(&self) -> Dialect;

    /// Cheap liveness check.
    async fn ping(&self) -> Result<(), DbError>;

    /// Create the table and indexes if they don't exist.
    async fn init_schema(&self) -> Result<(), DbError>;

    /// Write a new record; returns it with the server-assigned `created_at`.
    async fn insert(&self, record: NewAnalysis) -> Result<Analysis, DbError>;

    /// Fetch one record by id.
    async fn get(&self, id: &str) -> Result<Option<Analysis>, DbError>;

    /// Records whose topics or keywords contain `term` as a whole token,
    /// newest first.
    async fn search(&self, term: &str) -> Result<Vec<Analysis>, DbError>;
}
