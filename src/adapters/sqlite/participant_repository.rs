//! SQLite implementation of the ParticipantRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::adapters::sqlite::{parse_datetime, parse_json_or_default};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ParticipantRecord;
use crate::domain::ports::ParticipantRepository;

pub struct SqliteParticipantRepository {
    pool: SqlitePool,
}

impl SqliteParticipantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for SqliteParticipantRepository {
    async fn get(&self, identifier: &str) -> DomainResult<Option<ParticipantRecord>> {
        let row: Option<ParticipantRow> = sqlx::query_as(
            "SELECT * FROM participants WHERE identifier = ?"
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.try_into()).transpose()
    }

    async fn put(&self, record: &ParticipantRecord) -> DomainResult<()> {
        let tasks = serde_json::to_string(&record.tasks)?;
        let auxiliary = serde_json::to_string(&record.auxiliary)?;

        // Single statement: the whole record is replaced or nothing is.
        sqlx::query(
            r#"INSERT INTO participants (identifier, location, tasks, auxiliary, change_count, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(identifier) DO UPDATE SET
                   location = excluded.location,
                   tasks = excluded.tasks,
                   auxiliary = excluded.auxiliary,
                   change_count = excluded.change_count,
                   updated_at = excluded.updated_at"#
        )
        .bind(&record.identifier)
        .bind(&record.location)
        .bind(tasks)
        .bind(auxiliary)
        .bind(i64::from(record.change_count))
        .bind(record.created_at.to_rfc3339())
        .bind(record.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_all(&self) -> DomainResult<Vec<ParticipantRecord>> {
        let rows: Vec<ParticipantRow> = sqlx::query_as(
            "SELECT * FROM participants ORDER BY identifier"
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn reset_change_counters(&self) -> DomainResult<u64> {
        let result = sqlx::query("UPDATE participants SET change_count = 0 WHERE change_count <> 0")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> DomainResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM participants")
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(count).map_err(|e| DomainError::SerializationError(e.to_string()))
    }
}

#[derive(sqlx::FromRow)]
struct ParticipantRow {
    identifier: String,
    location: String,
    tasks: Option<String>,
    auxiliary: Option<String>,
    change_count: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ParticipantRow> for ParticipantRecord {
    type Error = DomainError;

    fn try_from(row: ParticipantRow) -> Result<Self, Self::Error> {
        let change_count = u32::try_from(row.change_count).map_err(|_| {
            DomainError::SerializationError(format!(
                "Invalid change_count {} for {}",
                row.change_count, row.identifier
            ))
        })?;

        Ok(ParticipantRecord {
            tasks: parse_json_or_default(row.tasks)?,
            auxiliary: parse_json_or_default(row.auxiliary)?,
            change_count,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            identifier: row.identifier,
            location: row.location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use crate::domain::models::{AuxValue, CompletionState};

    async fn setup_test_repo() -> SqliteParticipantRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteParticipantRepository::new(pool)
    }

    #[tokio::test]
    async fn test_put_and_get_participant() {
        let repo = setup_test_repo().await;
        let mut record = ParticipantRecord::new("Alice", "North", ["impact", "connect"]);
        record.complete_task("impact");
        record.set_auxiliary("hours", AuxValue::Integer(6));

        repo.put(&record).await.unwrap();

        let retrieved = repo.get("Alice").await.unwrap().unwrap();
        assert_eq!(retrieved.location, "North");
        assert_eq!(retrieved.state("impact"), CompletionState::Complete);
        assert_eq!(retrieved.state("connect"), CompletionState::NotSeen);
        assert_eq!(retrieved.auxiliary_integer("hours"), Some(6));
        assert_eq!(retrieved.change_count, 1);

        assert!(repo.get("Bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_existing_record() {
        let repo = setup_test_repo().await;
        let mut record = ParticipantRecord::new("Alice", "North", ["impact", "connect"]);
        repo.put(&record).await.unwrap();

        record.complete_task("connect");
        repo.put(&record).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 1);
        let retrieved = repo.get("Alice").await.unwrap().unwrap();
        assert!(retrieved.is_complete("connect"));
    }

    #[tokio::test]
    async fn test_reset_change_counters_keeps_states() {
        let repo = setup_test_repo().await;
        let mut a = ParticipantRecord::new("Alice", "North", ["impact"]);
        a.complete_task("impact");
        let b = ParticipantRecord::new("Bob", "South", ["impact"]);
        repo.put(&a).await.unwrap();
        repo.put(&b).await.unwrap();

        assert_eq!(repo.reset_change_counters().await.unwrap(), 1);

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].identifier, "Alice");
        assert!(all.iter().all(|r| r.change_count == 0));
        assert!(all[0].is_complete("impact"));
    }
}
