//! Domain errors for the taskroll reconciliation system.

use thiserror::Error;

/// Storage-level errors raised by repository implementations.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Output error: {0}")]
    OutputError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

/// Why a single input row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowDefect {
    /// The identifier column is blank.
    MissingIdentifier,
    /// The row has fewer columns than the survey layout requires.
    ShortRow { expected: usize, found: usize },
    /// The task-name column matches no registered task.
    UnknownTask { task_name: String },
    /// The source could not decode the record.
    Unreadable { message: String },
}

impl std::fmt::Display for RowDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingIdentifier => write!(f, "identifier field is empty"),
            Self::ShortRow { expected, found } => {
                write!(f, "expected at least {expected} fields, found {found}")
            }
            Self::UnknownTask { task_name } => {
                write!(f, "no registered task matches '{task_name}'")
            }
            Self::Unreadable { message } => write!(f, "unreadable record: {message}"),
        }
    }
}

/// Errors raised while importing a survey export.
///
/// Only [`ImportError::SourceUnavailable`], [`ImportError::Schema`] and
/// [`ImportError::Storage`] abort a run. Row and field errors are recovered
/// locally by the reconciliation engine.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Input source unavailable: {path}: {message}")]
    SourceUnavailable { path: String, message: String },

    #[error("Malformed row at line {line}: {defect}")]
    MalformedRow { line: u64, defect: RowDefect },

    #[error("Malformed field '{field}' at line {line}: expected an integer, found '{value}'")]
    MalformedField {
        line: u64,
        field: String,
        value: String,
    },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error(transparent)]
    Storage(#[from] DomainError),
}

impl ImportError {
    /// Whether this error must halt the whole run.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. } | Self::Schema(_) | Self::Storage(_)
        )
    }
}

pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality_split() {
        let missing = ImportError::SourceUnavailable {
            path: "survey.csv".to_string(),
            message: "No such file".to_string(),
        };
        assert!(missing.is_fatal());
        assert!(ImportError::Schema("width".to_string()).is_fatal());

        let row = ImportError::MalformedRow {
            line: 3,
            defect: RowDefect::MissingIdentifier,
        };
        assert!(!row.is_fatal());
        assert_eq!(
            row.to_string(),
            "Malformed row at line 3: identifier field is empty"
        );
    }

    #[test]
    fn test_domain_error_from_sqlx() {
        let err = DomainError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DomainError::DatabaseError(_)));
        assert_eq!(
            DomainError::ParticipantNotFound("Ada".to_string()).to_string(),
            "Participant not found: Ada"
        );
    }

    #[test]
    fn test_short_row_message() {
        let defect = RowDefect::ShortRow { expected: 15, found: 4 };
        assert_eq!(defect.to_string(), "expected at least 15 fields, found 4");
    }
}
