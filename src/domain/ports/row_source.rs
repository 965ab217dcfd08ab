//! Input row source port.

use crate::domain::errors::ImportResult;
use crate::domain::models::InputRow;

/// Forward-only stream of survey rows with the header already consumed.
///
/// Per-record decoding failures surface as `Err(ImportError::MalformedRow)`
/// items; the stream keeps going after them.
pub trait RowSource: Iterator<Item = ImportResult<InputRow>> {
    /// Column count declared by the header, if the source had one.
    fn header_width(&self) -> Option<usize>;

    /// Human-readable origin, recorded in the run history.
    fn label(&self) -> &str;
}

/// Row source over rows already held in memory.
pub struct StaticRowSource {
    label: String,
    header_width: Option<usize>,
    rows: std::vec::IntoIter<InputRow>,
}

impl StaticRowSource {
    /// Build a source from bare field lists, numbering lines from 2.
    pub fn from_fields(label: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .zip(2u64..)
            .map(|(fields, line)| InputRow::new(line, fields))
            .collect();
        Self::new(label, rows)
    }

    pub fn new(label: impl Into<String>, rows: Vec<InputRow>) -> Self {
        Self {
            label: label.into(),
            header_width: None,
            rows: rows.into_iter(),
        }
    }

    pub fn with_header_width(mut self, width: usize) -> Self {
        self.header_width = Some(width);
        self
    }
}

impl Iterator for StaticRowSource {
    type Item = ImportResult<InputRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(Ok)
    }
}

impl RowSource for StaticRowSource {
    fn header_width(&self) -> Option<usize> {
        self.header_width
    }

    fn label(&self) -> &str {
        &self.label
    }
}
