//! Reconciliation services: the task predicate registry, the reconciliation
//! engine and the read-side report projection.

pub mod reconciliation_engine;
pub mod report_projection;
pub mod task_registry;

pub use reconciliation_engine::{ImportRun, ReconciliationEngine, RowOutcome};
pub use report_projection::project;
pub use task_registry::{is_affirmative, Evaluation, FieldError, TaskRegistry, AFFIRMATIVE_TOKENS};
