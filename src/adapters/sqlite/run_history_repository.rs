//! SQLite implementation of the RunHistoryRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::RunRecord;
use crate::domain::ports::RunHistoryRepository;

pub struct SqliteRunHistoryRepository {
    pool: SqlitePool,
}

impl SqliteRunHistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn to_i64(value: u64) -> DomainResult<i64> {
    i64::try_from(value).map_err(|e| DomainError::SerializationError(e.to_string()))
}

#[async_trait]
impl RunHistoryRepository for SqliteRunHistoryRepository {
    async fn record_run(&self, run: &RunRecord) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO import_runs (id, source, started_at, finished_at, rows_read, rows_processed, rows_skipped, records_created, records_changed, transitions)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#
        )
        .bind(run.id.to_string())
        .bind(&run.source)
        .bind(run.started_at.to_rfc3339())
        .bind(run.finished_at.to_rfc3339())
        .bind(to_i64(run.rows_read)?)
        .bind(to_i64(run.rows_processed)?)
        .bind(to_i64(run.rows_skipped)?)
        .bind(to_i64(run.records_created)?)
        .bind(to_i64(run.records_changed)?)
        .bind(to_i64(run.transitions)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest(&self) -> DomainResult<Option<RunRecord>> {
        Ok(self.list(1).await?.into_iter().next())
    }

    async fn list(&self, limit: usize) -> DomainResult<Vec<RunRecord>> {
        let rows: Vec<RunRow> = sqlx::query_as(
            "SELECT * FROM import_runs ORDER BY finished_at DESC, started_at DESC LIMIT ?"
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }
}

#[derive(sqlx::FromRow)]
struct RunRow {
    id: String,
    source: String,
    started_at: String,
    finished_at: String,
    rows_read: i64,
    rows_processed: i64,
    rows_skipped: i64,
    records_created: i64,
    records_changed: i64,
    transitions: i64,
}

fn to_u64(value: i64) -> DomainResult<u64> {
    u64::try_from(value).map_err(|e| DomainError::SerializationError(e.to_string()))
}

impl TryFrom<RunRow> for RunRecord {
    type Error = DomainError;

    fn try_from(row: RunRow) -> Result<Self, Self::Error> {
        Ok(RunRecord {
            id: parse_uuid(&row.id)?,
            source: row.source,
            started_at: parse_datetime(&row.started_at)?,
            finished_at: parse_datetime(&row.finished_at)?,
            rows_read: to_u64(row.rows_read)?,
            rows_processed: to_u64(row.rows_processed)?,
            rows_skipped: to_u64(row.rows_skipped)?,
            records_created: to_u64(row.records_created)?,
            records_changed: to_u64(row.records_changed)?,
            transitions: to_u64(row.transitions)?,
        })
    }
}
