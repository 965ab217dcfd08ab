//! Adapters for external systems: SQLite storage and CSV files.

pub mod sqlite;
pub mod tabular;
