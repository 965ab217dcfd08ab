//! Import run history port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::RunRecord;

/// Repository interface for finished import runs.
#[async_trait]
pub trait RunHistoryRepository: Send + Sync {
    /// Persist a finished run.
    async fn record_run(&self, run: &RunRecord) -> DomainResult<()>;

    /// Most recently finished run, if any.
    async fn latest(&self) -> DomainResult<Option<RunRecord>>;

    /// Recent runs, newest first.
    async fn list(&self, limit: usize) -> DomainResult<Vec<RunRecord>>;
}
