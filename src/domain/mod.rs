//! Domain layer for taskroll
//!
//! Participant records, task definitions, the survey row layout and the
//! ports the reconciliation services depend on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult, ImportError, ImportResult, RowDefect};
