//! Error types for the complaint load pipeline.

use crime_loader_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur while reading, transforming or indexing rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// The input file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(String),

    /// The input file has no lines at all, not even a header.
    #[error("Input file is empty: {0}")]
    EmptyFile(String),

    /// A row could not be parsed as CSV.
    #[error("CSV error at line {line}: {message}")]
    Csv { line: u64, message: String },

    /// The header does not match the field mapping.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A row cannot be turned into a document.
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    /// The search backend rejected or failed an operation.
    #[error("Search index error: {0}")]
    Index(#[from] SearchIndexError),

    /// The loader was used outside its lifecycle.
    #[error("Invalid loader state: {0}")]
    InvalidState(String),
}

impl IngestError {
    /// Create an I/O error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Create a schema error.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Create a malformed row error for a row with too few fields.
    pub fn short_row(line: u64, expected: usize, found: usize) -> Self {
        Self::MalformedRow {
            line,
            reason: format!("expected at least {} fields, found {}", expected, found),
        }
    }

    /// Create a malformed row error for a row without a document key.
    pub fn missing_key(line: u64, field: &str) -> Self {
        Self::MalformedRow {
            line,
            reason: format!("document key field '{}' is empty", field),
        }
    }

    /// Line number of the offending row, for row-level errors.
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::Csv { line, .. } | Self::MalformedRow { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Whether the error ends the load regardless of the row error policy.
    ///
    /// Row-level problems (bad CSV, malformed rows, a document the backend
    /// rejects) are not fatal; losing the file or the backend is.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Csv { .. } | Self::MalformedRow { .. } => false,
            Self::Index(e) => e.is_fatal(),
            _ => true,
        }
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.kind() {
            csv::ErrorKind::Io(e) => Self::Io(e.to_string()),
            _ => Self::Csv {
                line,
                message: err.to_string(),
            },
        }
    }
}
