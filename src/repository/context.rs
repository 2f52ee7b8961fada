//! Store selection at startup.
//!
//! A networked database URL is tried first with a bounded liveness check;
//! if it can't be reached the service continues on the embedded file.

use std::sync::Arc;

use tracing::{info, warn};

use super::analysis::{AnalysisStore, SqliteAnalysisStore};
use super::pool::DbError;
use crate::config::DatabaseSettings;

#[cfg(feature = "postgres")]
use super::analysis::PgAnalysisStore;
#[cfg(feature = "postgres")]
use super::pool::PgPool;
#[cfg(feature = "postgres")]
use super::util::to_diesel_error;

/// Pick a backend, make sure its schema exists, and return it.
pub async fn connect(settings: &DatabaseSettings) -> Result<Arc<dyn AnalysisStore>, DbError> {
    let store = select_store(settings).await;
    store.init_schema().await?;
    info!("Using {} store", store.dialect());
    Ok(store)
}

async fn select_store(settings: &DatabaseSettings) -> Arc<dyn AnalysisStore> {
    if let Some(url) = settings.postgres_url() {
        #[cfg(feature = "postgres")]
        {
            match connect_postgres(url, settings).await {
                Ok(store) => {
                    info!("Connected to PostgreSQL at {}", settings.display_url());
                    return Arc::new(store);
                }
                Err(e) => warn!(
                    "PostgreSQL at {} unavailable ({}), falling back to SQLite",
                    settings.display_url(),
                    e
                ),
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            let _ = url;
            warn!(
                "Built without PostgreSQL support, ignoring {}",
                settings.display_url()
            );
        }
    }

    let sqlite_url = settings.sqlite_url();
    info!("Opening SQLite database at {}", sqlite_url);
    Arc::new(SqliteAnalysisStore::open(&sqlite_url))
}

#[cfg(feature = "postgres")]
async fn connect_postgres(url: &str, settings: &DatabaseSettings) -> Result<PgAnalysisStore, DbError> {
    let store = PgAnalysisStore::new(PgPool::new(url, settings.pool_size)?);
    tokio::time::timeout(settings.connect_timeout(), store.ping())
        .await
        .map_err(|_| {
            to_diesel_error(format!(
                "no response within {}s",
                settings.connect_timeout_secs
            ))
        })??;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::analysis::Dialect;

    #[tokio::test]
    async fn test_connect_sqlite_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let settings = DatabaseSettings::sqlite(dir.path().join("ctx.db"));

        let store = connect(&settings).await.unwrap();
        assert_eq!(store.dialect(), Dialect::Sqlite);
        assert!(store.search("anything").await.unwrap().is_empty());
    }

    #[cfg(feature = "postgres")]
    #[tokio::test]
    async fn test_unreachable_postgres_falls_back_to_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let settings = DatabaseSettings {
            database_url: Some("postgres://user:pw@127.0.0.1:1/nothing".to_string()),
            connect_timeout_secs: 2,
            ..DatabaseSettings::sqlite(dir.path().join("fallback.db"))
        };

        let store = connect(&settings).await.unwrap();
        assert_eq!(store.dialect(), Dialect::Sqlite);
        assert!(dir.path().join("fallback.db").exists());
    }
}
