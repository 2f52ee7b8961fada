//! Networked (PostgreSQL) analysis store. List columns are native `TEXT[]`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::sql_types::{Array, Double, Nullable, Text, Timestamptz};
use diesel::OptionalExtension;
use diesel_async::RunQueryDsl;
use tracing::debug;

use super::{AnalysisStore, Dialect};
use crate::models::{Analysis, NewAnalysis};
use crate::repository::pool::{DbError, PgPool};

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS analyses (
        id TEXT PRIMARY KEY,
        raw_text TEXT NOT NULL,
        summary TEXT,
        title TEXT,
        topics TEXT[],
        sentiment TEXT,
        keywords TEXT[],
        confidence DOUBLE PRECISION,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_analyses_topics ON analyses USING GIN (topics)",
    "CREATE INDEX IF NOT EXISTS idx_analyses_keywords ON analyses USING GIN (keywords)",
    "CREATE INDEX IF NOT EXISTS idx_analyses_created_at ON analyses (created_at DESC)",
];

// confidence is cast so tables created with NUMERIC still read as f64.
const SELECT: &str = "SELECT id, raw_text, summary, title, topics, sentiment, keywords, \
    confidence::double precision AS confidence, created_at FROM analyses";

const INSERT: &str = "INSERT INTO analyses \
    (id, raw_text, summary, title, topics, sentiment, keywords, confidence) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING created_at";

#[derive(diesel::QueryableByName)]
struct PgAnalysisRow {
    #[diesel(sql_type = Text)]
    id: String,
    #[diesel(sql_type = Text)]
    raw_text: String,
    #[diesel(sql_type = Nullable<Text>)]
    summary: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    title: Option<String>,
    #[diesel(sql_type = Nullable<Array<Nullable<Text>>>)]
    topics: Option<Vec<Option<String>>>,
    #[diesel(sql_type = Nullable<Text>)]
    sentiment: Option<String>,
    #[diesel(sql_type = Nullable<Array<Nullable<Text>>>)]
    keywords: Option<Vec<Option<String>>>,
    #[diesel(sql_type = Nullable<Double>)]
    confidence: Option<f64>,
    #[diesel(sql_type = Nullable<Timestamptz>)]
    created_at: Option<DateTime<Utc>>,
}

/// NULL array or NULL elements collapse to what the caller can see.
fn flatten(values: Option<Vec<Option<String>>>) -> Vec<String> {
    values.unwrap_or_default().into_iter().flatten().collect()
}

impl From<PgAnalysisRow> for Analysis {
    fn from(row: PgAnalysisRow) -> Self {
        Analysis {
            id: row.id,
            raw_text: row.raw_text,
            summary: row.summary.unwrap_or_default(),
            title: row.title.unwrap_or_default(),
            topics: flatten(row.topics),
            sentiment: row.sentiment.unwrap_or_default(),
            keywords: flatten(row.keywords),
            confidence: row.confidence.unwrap_or_default(),
            created_at: row.created_at.unwrap_or(DateTime::UNIX_EPOCH),
        }
    }
}

#[derive(diesel::QueryableByName)]
struct CreatedAtRow {
    #[diesel(sql_type = Timestamptz)]
    created_at: DateTime<Utc>,
}

/// Analysis store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn ping(&self) -> Result<(), DbError> {
        let mut conn = self.pool.get().await?;
        diesel::sql_query("SELECT 1").execute(&mut conn).await?;
        Ok(())
    }

    async fn init_schema(&self) -> Result<(), DbError> {
        let mut conn = self.pool.get().await?;
        for statement in SCHEMA {
            diesel::sql_query(*statement).execute(&mut conn).await?;
        }
        Ok(())
    }

    async fn insert(&self, record: NewAnalysis) -> Result<Analysis, DbError> {
        let mut conn = self.pool.get().await?;

        let row: CreatedAtRow = diesel::sql_query(INSERT)
            .bind::<Text, _>(&record.id)
            .bind::<Text, _>(&record.raw_text)
            .bind::<Text, _>(&record.summary)
            .bind::<Text, _>(&record.title)
            .bind::<Array<Text>, _>(&record.topics)
            .bind::<Text, _>(&record.sentiment)
            .bind::<Array<Text>, _>(&record.keywords)
            .bind::<Double, _>(record.confidence)
            .get_result(&mut conn)
            .await?;

        debug!("Inserted analysis {} (postgres)", record.id);
        Ok(record.into_analysis(row.created_at))
    }

    async fn get(&self, id: &str) -> Result<Option<Analysis>, DbError> {
        let mut conn = self.pool.get().await?;

        let row: Option<PgAnalysisRow> = diesel::sql_query(format!("{} WHERE id = $1", SELECT))
            .bind::<Text, _>(id)
            .get_result(&mut conn)
            .await
            .optional()?;

        Ok(row.map(Analysis::from))
    }

    async fn search(&self, term: &str) -> Result<Vec<Analysis>, DbError> {
        let mut conn = self.pool.get().await?;

        let query = format!(
            "{} WHERE $1 = ANY(topics) OR $1 = ANY(keywords) ORDER BY created_at DESC, id",
            SELECT
        );
        let rows: Vec<PgAnalysisRow> = diesel::sql_query(query)
            .bind::<Text, _>(term)
            .load(&mut conn)
            .await?;

        debug!("Search '{}' (postgres): {} matches", term, rows.len());
        Ok(rows.into_iter().map(Analysis::from).collect())
    }
}
