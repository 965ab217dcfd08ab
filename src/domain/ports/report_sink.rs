//! Report sink port.

use crate::domain::errors::DomainResult;
use crate::domain::models::ReportTable;

/// Destination for rendered report tables.
///
/// Sinks must emit rows in the order given.
pub trait ReportSink {
    fn write_table(&mut self, table: &ReportTable) -> DomainResult<()>;
}

/// Sink that keeps tables in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub tables: Vec<ReportTable>,
}

impl ReportSink for CollectingSink {
    fn write_table(&mut self, table: &ReportTable) -> DomainResult<()> {
        self.tables.push(table.clone());
        Ok(())
    }
}
