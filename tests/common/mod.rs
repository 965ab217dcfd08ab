//! Common test utilities for integration tests
//!
//! Survey rows here use the standard 15-column layout.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use taskroll::adapters::sqlite::{
    create_migrated_test_pool, SqliteParticipantRepository, SqliteRunHistoryRepository,
};
use taskroll::domain::models::{Predicate, SurveyField, SurveySchema, TaskDefinition};
use taskroll::services::{ReconciliationEngine, TaskRegistry};

pub const HEADER: &str = "Name,Task,Hours Confirmed,Hours,Profile,Notes,Survey,Campus,Email,Phone,Idea,Video,Comment,Attendees,Voted";

/// Two-task registry: Impact reads the hours flag, Connect the video flag.
pub fn impact_connect_registry() -> TaskRegistry {
    TaskRegistry::new(
        SurveySchema::STANDARD,
        vec![
            TaskDefinition::new("impact", "Impact", Predicate::Flag(SurveyField::HoursConfirmed)),
            TaskDefinition::new("connect", "Connect", Predicate::Flag(SurveyField::VideoShared)),
        ],
    )
    .expect("test registry should be valid")
}

/// Build a full-width row with the given fields set.
pub fn row(name: &str, task: &str, campus: &str, set: &[(SurveyField, &str)]) -> Vec<String> {
    let mut fields = vec![String::new(); SurveySchema::STANDARD.width];
    fields[SurveyField::Name.column()] = name.to_string();
    fields[SurveyField::TaskName.column()] = task.to_string();
    fields[SurveyField::Campus.column()] = campus.to_string();
    for (field, value) in set {
        fields[field.column()] = (*value).to_string();
    }
    fields
}

/// Render rows as CSV lines (no quoting; test values contain no commas).
pub fn csv_lines(rows: &[Vec<String>]) -> String {
    rows.iter().map(|r| r.join(",") + "\n").collect()
}

/// Write a survey export with the standard header into a temp directory.
pub fn write_export(rows: &[Vec<String>]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("survey.csv");
    let mut file = std::fs::File::create(&path).expect("Failed to create export");
    writeln!(file, "{HEADER}").expect("Failed to write header");
    file.write_all(csv_lines(rows).as_bytes())
        .expect("Failed to write rows");
    (dir, path)
}

pub struct TestStore {
    pub engine: ReconciliationEngine,
    pub participants: Arc<SqliteParticipantRepository>,
    pub runs: Arc<SqliteRunHistoryRepository>,
}

/// Engine over a fresh in-memory database.
pub async fn store_with(registry: TaskRegistry) -> TestStore {
    let pool = create_migrated_test_pool()
        .await
        .expect("Failed to create test pool");
    let participants = Arc::new(SqliteParticipantRepository::new(pool.clone()));
    let runs = Arc::new(SqliteRunHistoryRepository::new(pool));
    let engine = ReconciliationEngine::new(Arc::new(registry), participants.clone())
        .with_run_history(runs.clone());
    TestStore {
        engine,
        participants,
        runs,
    }
}

/// Initialize tracing for tests that want log output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
