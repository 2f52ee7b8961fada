//! Repository layer for database persistence.
//!
//! Uses Diesel with raw SQL over diesel-async. Supports both SQLite and
//! PostgreSQL backends.

pub mod analysis;
pub mod codec;
pub mod context;
pub mod pool;
pub mod util;

pub use analysis::{AnalysisStore, Dialect, SqliteAnalysisStore};
#[cfg(feature = "postgres")]
pub use analysis::PgAnalysisStore;
pub use context::connect;
pub use pool::DbError;
