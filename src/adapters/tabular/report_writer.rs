//! CSV report output.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ReportTable;
use crate::domain::ports::ReportSink;

/// Writes report tables as CSV: header line, then rows in the given order.
pub struct CsvReportSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvReportSink<File> {
    pub fn create(path: &Path) -> DomainResult<Self> {
        let writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| DomainError::OutputError(format!("{}: {e}", path.display())))?;
        Ok(Self { writer })
    }
}

impl<W: Write> CsvReportSink<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().flexible(true).from_writer(writer),
        }
    }

    pub fn into_inner(self) -> DomainResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| DomainError::OutputError(e.to_string()))
    }
}

impl<W: Write> ReportSink for CsvReportSink<W> {
    fn write_table(&mut self, table: &ReportTable) -> DomainResult<()> {
        let out = |e: csv::Error| DomainError::OutputError(e.to_string());

        self.writer.write_record(&table.header).map_err(out)?;
        for row in &table.rows {
            self.writer.write_record(row).map_err(out)?;
        }
        self.writer
            .flush()
            .map_err(|e| DomainError::OutputError(e.to_string()))
    }
}
