//! CSV survey export reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::errors::{ImportError, ImportResult, RowDefect};
use crate::domain::models::InputRow;
use crate::domain::ports::RowSource;

/// Reads a survey export one record at a time.
///
/// Records may have any number of fields; length checks belong to the
/// reconciliation engine so that short rows are skipped rather than fatal.
pub struct CsvRowSource<R: Read> {
    label: String,
    header_width: Option<usize>,
    records: csv::StringRecordsIntoIter<R>,
    fallback_line: u64,
}

impl CsvRowSource<File> {
    /// Open an export on disk. `header_rows` is 0 or 1.
    pub fn open(path: &Path, header_rows: usize) -> ImportResult<Self> {
        let file = File::open(path).map_err(|e| ImportError::SourceUnavailable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_reader(path.display().to_string(), file, header_rows > 0)
    }
}

impl<R: Read> CsvRowSource<R> {
    pub fn from_reader(label: impl Into<String>, reader: R, has_header: bool) -> ImportResult<Self> {
        let label = label.into();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(has_header)
            .flexible(true)
            .from_reader(reader);

        let header_width = if has_header {
            let header = reader.headers().map_err(|e| ImportError::SourceUnavailable {
                path: label.clone(),
                message: format!("unreadable header: {e}"),
            })?;
            // An empty file has no header and no rows.
            (!header.is_empty()).then_some(header.len())
        } else {
            None
        };

        Ok(Self {
            label,
            header_width,
            records: reader.into_records(),
            fallback_line: if has_header { 1 } else { 0 },
        })
    }
}

impl<R: Read> Iterator for CsvRowSource<R> {
    type Item = ImportResult<InputRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.records.next()?;
        self.fallback_line += 1;

        Some(match item {
            Ok(record) => {
                let line = record.position().map_or(self.fallback_line, csv::Position::line);
                Ok(InputRow::new(line, record.iter().map(str::to_string).collect()))
            }
            Err(err) if err.is_io_error() => Err(ImportError::SourceUnavailable {
                path: self.label.clone(),
                message: err.to_string(),
            }),
            Err(err) => Err(ImportError::MalformedRow {
                line: err.position().map_or(self.fallback_line, csv::Position::line),
                defect: RowDefect::Unreadable {
                    message: err.to_string(),
                },
            }),
        })
    }
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn header_width(&self) -> Option<usize> {
        self.header_width
    }

    fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_rows_after_header() {
        let data = "Name,Task,Flag\nAlice,Power of One,Yes\n\"Smith, Bob\",One Voice\n";
        let source = CsvRowSource::from_reader("inline", data.as_bytes(), true).unwrap();
        assert_eq!(source.header_width(), Some(3));

        let rows: Vec<InputRow> = source.map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].fields, vec!["Alice", "Power of One", "Yes"]);
        assert_eq!(rows[1].fields, vec!["Smith, Bob", "One Voice"]);
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn test_invalid_utf8_is_a_malformed_row() {
        let mut data = b"Name,Task\nAlice,One Voice\n".to_vec();
        data.extend_from_slice(b"Bo\xffb,One Idea\nCara,One Idea\n");
        let source = CsvRowSource::from_reader("inline", data.as_slice(), true).unwrap();

        let items: Vec<_> = source.collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert!(matches!(
            items[1],
            Err(ImportError::MalformedRow { defect: RowDefect::Unreadable { .. }, .. })
        ));
        assert!(items[2].is_ok());
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvRowSource::open(&dir.path().join("absent.csv"), 1).err().unwrap();
        assert!(matches!(err, ImportError::SourceUnavailable { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_empty_file_has_no_header() {
        let mut source = CsvRowSource::from_reader("empty", "".as_bytes(), true).unwrap();
        assert_eq!(source.header_width(), None);
        assert!(source.next().is_none());
    }
}
