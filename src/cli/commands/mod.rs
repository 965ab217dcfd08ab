//! CLI command implementations.

pub mod import;
pub mod init;
pub mod report;
pub mod runs;
pub mod show;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

use crate::adapters::sqlite::{initialize_database, SqliteParticipantRepository, SqliteRunHistoryRepository};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::{ReconciliationEngine, TaskRegistry};

/// Load configuration from `--config` or the project layers.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Open the configured store and apply pending migrations.
pub async fn open_store(config: &Config) -> Result<SqlitePool> {
    initialize_database(&config.database)
        .await
        .with_context(|| format!("Failed to open database at {}", config.database.path))
}

/// Build an engine over the standard task registry with run history enabled.
pub fn build_engine(pool: &SqlitePool) -> ReconciliationEngine {
    let participants = Arc::new(SqliteParticipantRepository::new(pool.clone()));
    let runs = Arc::new(SqliteRunHistoryRepository::new(pool.clone()));
    ReconciliationEngine::new(Arc::new(TaskRegistry::standard()), participants).with_run_history(runs)
}
