//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces that adapters implement:
//! - ParticipantRepository: participant record persistence
//! - RunHistoryRepository: finished import runs
//! - RowSource: survey rows, one at a time
//! - ReportSink: ordered report tables
//!
//! These traits keep the reconciliation logic independent of SQLite, CSV and
//! the terminal.

pub mod participant_repository;
pub mod report_sink;
pub mod row_source;
pub mod run_history_repository;

pub use participant_repository::ParticipantRepository;
pub use report_sink::{CollectingSink, ReportSink};
pub use row_source::{RowSource, StaticRowSource};
pub use run_history_repository::RunHistoryRepository;
