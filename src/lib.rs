//! Taskroll - survey export reconciliation
//!
//! Taskroll reads weekly survey exports, decides which tasks each participant
//! has completed, and merges the result into a persistent participant store.
//! Completion only ever moves forward, so replaying an export is harmless.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and the ports the engine talks to
//! - **Service Layer** (`services`): Task registry, reconciliation engine and report projection
//! - **Adapters** (`adapters`): SQLite storage and CSV input/output
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use taskroll::adapters::sqlite::{create_migrated_test_pool, SqliteParticipantRepository};
//! use taskroll::adapters::tabular::CsvRowSource;
//! use taskroll::services::{ReconciliationEngine, TaskRegistry};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = create_migrated_test_pool().await?;
//!     let engine = ReconciliationEngine::new(
//!         Arc::new(TaskRegistry::standard()),
//!         Arc::new(SqliteParticipantRepository::new(pool)),
//!     );
//!     let source = CsvRowSource::open("survey.csv".as_ref(), 1)?;
//!     let (summary, report) = engine.run_import(source).await?;
//!     println!("{} rows, {} fully complete", summary.rows_read, report.fully_complete.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, ImportError, RowDefect};
pub use domain::models::{
    CompletionState, Config, InputRow, ParticipantRecord, ReportView, RunSummary, SurveyField,
    TaskDefinition,
};
pub use domain::ports::{ParticipantRepository, ReportSink, RowSource, RunHistoryRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ReconciliationEngine, TaskRegistry};
