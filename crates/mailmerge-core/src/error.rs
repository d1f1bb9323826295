//! Error types for mailmerge-core

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mailmerge-core
#[derive(Debug, Error)]
pub enum Error {
    /// Input text contained no records at all
    #[error("input contains no records")]
    EmptyInput,

    /// The header record repeats a column name (case-sensitive)
    #[error("duplicate header '{name}'")]
    DuplicateHeader { name: String },

    /// A data record carried more values than the header declares
    #[error("row {row} has {found} values but the header lists {expected} columns")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The declared media type is not delimited/plain text
    #[error("unsupported media type '{declared}', expected text/csv or text/plain")]
    UnsupportedMediaType { declared: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Paginated document emission failed
    #[error("document rendering failed: {message}")]
    Document { message: String },
}
