pub mod config;
pub mod participant;
pub mod report;
pub mod row;
pub mod run;
pub mod task;

pub use config::{Config, DatabaseConfig, ImportConfig, LoggingConfig};
pub use participant::ParticipantRecord;
pub use report::{
    AuxiliaryTotal, LocationTotal, ParticipantSummary, ReportTable, ReportView, TaskTotal,
};
pub use row::{InputRow, SurveyField, SurveySchema};
pub use run::{FieldDiagnostic, RunRecord, RunSummary, SkippedRow};
pub use task::{AuxKind, AuxValue, AuxiliarySpec, CompletionState, Predicate, TaskDefinition};
