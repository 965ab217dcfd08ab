//! CSV adapters: survey export input and report file output.

pub mod report_writer;
pub mod row_source;

pub use report_writer::CsvReportSink;
pub use row_source::CsvRowSource;
