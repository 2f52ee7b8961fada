//! Embedded (SQLite) analysis store.

use async_trait::async_trait;
use diesel::sql_types::{Double, Nullable, Text};
use diesel::OptionalExtension;
use diesel_async::{RunQueryDsl, SimpleAsyncConnection};
use tracing::debug;

use super::{AnalysisStore, Dialect};
use crate::models::{Analysis, NewAnalysis};
use crate::repository::codec;
use crate::repository::pool::{DbError, SqlitePool};
use crate::repository::util::parse_datetime;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS analyses (
    id TEXT PRIMARY KEY,
    raw_text TEXT NOT NULL,
    summary TEXT,
    title TEXT,
    topics TEXT,
    sentiment TEXT,
    keywords TEXT,
    confidence REAL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
CREATE INDEX IF NOT EXISTS idx_analyses_created_at ON analyses (created_at);
"#;

const SELECT_COLUMNS: &str =
    "id, raw_text, summary, title, topics, sentiment, keywords, confidence, created_at";

const INSERT: &str = "INSERT INTO analyses \
    (id, raw_text, summary, title, topics, sentiment, keywords, confidence) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING created_at";

/// Row as stored by the embedded backend: list columns are delimited text.
#[derive(diesel::QueryableByName)]
struct SqliteAnalysisRow {
    #[diesel(sql_type = Text)]
    id: String,
    #[diesel(sql_type = Text)]
    raw_text: String,
    #[diesel(sql_type = Nullable<Text>)]
    summary: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    title: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    topics: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    sentiment: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    keywords: Option<String>,
    #[diesel(sql_type = Nullable<Double>)]
    confidence: Option<f64>,
    #[diesel(sql_type = Nullable<Text>)]
    created_at: Option<String>,
}

impl SqliteAnalysisRow {
    /// Token-exact membership test against the decoded list columns.
    fn mentions(&self, term: &str) -> bool {
        codec::contains_token(self.topics.as_deref(), term)
            || codec::contains_token(self.keywords.as_deref(), term)
    }
}

impl From<SqliteAnalysisRow> for Analysis {
    fn from(row: SqliteAnalysisRow) -> Self {
        Analysis {
            id: row.id,
            raw_text: row.raw_text,
            summary: row.summary.unwrap_or_default(),
            title: row.title.unwrap_or_default(),
            topics: codec::decode(row.topics.as_deref()),
            sentiment: row.sentiment.unwrap_or_default(),
            keywords: codec::decode(row.keywords.as_deref()),
            confidence: row.confidence.unwrap_or_default(),
            created_at: row
                .created_at
                .as_deref()
                .map(parse_datetime)
                .unwrap_or(chrono::DateTime::UNIX_EPOCH),
        }
    }
}

#[derive(diesel::QueryableByName)]
struct CreatedAtRow {
    #[diesel(sql_type = Text)]
    created_at: String,
}

/// Analysis store backed by a SQLite file.
#[derive(Clone)]
pub struct SqliteAnalysisStore {
    pool: SqlitePool,
}

impl SqliteAnalysisStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) a database file.
    pub fn open(database_url: &str) -> Self {
        Self::new(SqlitePool::new(database_url))
    }

    pub fn database_url(&self) -> &str {
        self.pool.database_url()
    }
}

#[async_trait]
impl AnalysisStore for SqliteAnalysisStore {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn ping(&self) -> Result<(), DbError> {
        let mut conn = self.pool.get().await?;
        conn.batch_execute("SELECT 1").await
    }

    async fn init_schema(&self) -> Result<(), DbError> {
        let mut conn = self.pool.get().await?;
        conn.batch_execute(SCHEMA).await
    }

    async fn insert(&self, mut record: NewAnalysis) -> Result<Analysis, DbError> {
        let mut conn = self.pool.get().await?;

        let topics = codec::encode(&record.topics);
        let keywords = codec::encode(&record.keywords);

        let row: CreatedAtRow = diesel::sql_query(INSERT)
            .bind::<Text, _>(&record.id)
            .bind::<Text, _>(&record.raw_text)
            .bind::<Text, _>(&record.summary)
            .bind::<Text, _>(&record.title)
            .bind::<Text, _>(&topics)
            .bind::<Text, _>(&record.sentiment)
            .bind::<Text, _>(&keywords)
            .bind::<Double, _>(record.confidence)
            .get_result(&mut conn)
            .await?;

        debug!("Inserted analysis {} (sqlite)", record.id);
        // Hand back what a later read will see
        record.topics = codec::decode(Some(&topics));
        record.keywords = codec::decode(Some(&keywords));
        Ok(record.into_analysis(parse_datetime(&row.created_at)))
    }

    async fn get(&self, id: &str) -> Result<Option<Analysis>, DbError> {
        let mut conn = self.pool.get().await?;

        let query = format!("SELECT {} FROM analyses WHERE id = ?", SELECT_COLUMNS);
        let row: Option<SqliteAnalysisRow> = diesel::sql_query(query)
            .bind::<Text, _>(id)
            .get_result(&mut conn)
            .await
            .optional()?;

        Ok(row.map(Analysis::from))
    }

    async fn search(&self, term: &str) -> Result<Vec<Analysis>, DbError> {
        let mut conn = self.pool.get().await?;

        // instr() narrows to substring hits; the token check below makes the
        // match exact so "go" does not return a row tagged only "mango".
        let query = format!(
            "SELECT {} FROM analyses \
             WHERE instr(topics, ?) > 0 OR instr(keywords, ?) > 0 \
             ORDER BY julianday(created_at) DESC, id",
            SELECT_COLUMNS
        );
        let rows: Vec<SqliteAnalysisRow> = diesel::sql_query(query)
            .bind::<Text, _>(term)
            .bind::<Text, _>(term)
            .load(&mut conn)
            .await?;

        let candidates = rows.len();
        let matches: Vec<Analysis> = rows
            .into_iter()
            .filter(|row| row.mentions(term))
            .map(Analysis::from)
            .collect();

        debug!(
            "Search '{}' (sqlite): {} substring candidates, {} token matches",
            term,
            candidates,
            matches.len()
        );
        Ok(matches)
    }
}
