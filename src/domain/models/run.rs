//! Import run bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::RowDefect;

/// A row rejected during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: u64,
    pub defect: RowDefect,
}

/// An auxiliary value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiagnostic {
    pub line: u64,
    pub identifier: String,
    pub task: String,
    pub field: String,
    pub value: String,
}

/// Outcome of one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Data rows handed to the engine (header excluded).
    pub rows_read: u64,
    /// Rows that passed validation, whether or not they changed anything.
    pub rows_processed: u64,
    pub skipped: Vec<SkippedRow>,
    pub field_diagnostics: Vec<FieldDiagnostic>,
    pub records_created: u64,
    /// Incomplete-to-complete transitions applied this run.
    pub transitions: u64,
    /// Distinct records with at least one transition this run.
    pub records_changed: u64,
}

impl RunSummary {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            source: source.into(),
            started_at: Utc::now(),
            finished_at: None,
            rows_read: 0,
            rows_processed: 0,
            skipped: Vec::new(),
            field_diagnostics: Vec::new(),
            records_created: 0,
            transitions: 0,
            records_changed: 0,
        }
    }

    pub fn rows_skipped(&self) -> u64 {
        self.skipped.len() as u64
    }
}

/// Persisted summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: Uuid,
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub rows_read: u64,
    pub rows_processed: u64,
    pub rows_skipped: u64,
    pub records_created: u64,
    pub records_changed: u64,
    pub transitions: u64,
}

impl From<&RunSummary> for RunRecord {
    fn from(summary: &RunSummary) -> Self {
        Self {
            id: summary.run_id,
            source: summary.source.clone(),
            started_at: summary.started_at,
            finished_at: summary.finished_at.unwrap_or_else(Utc::now),
            rows_read: summary.rows_read,
            rows_processed: summary.rows_processed,
            rows_skipped: summary.rows_skipped(),
            records_created: summary.records_created,
            records_changed: summary.records_changed,
            transitions: summary.transitions,
        }
    }
}
