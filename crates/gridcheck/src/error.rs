//! Error types for the gridcheck library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gridcheck operations.
///
/// Only structural failures are errors. A cell that fails a rule is reported
/// as an [`ErrorLocation`](crate::validation::ErrorLocation), never as an `Err`.
#[derive(Debug, Error)]
pub enum GridcheckError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension outside the configured set.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Delimited-text file with no content after stripping whitespace.
    #[error("File is empty: {0}")]
    EmptyFile(PathBuf),

    /// Lower-level read failure (corrupt workbook, unreadable text).
    #[error("Error reading file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// A requested sheet is not in the workbook.
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    /// No usable header row could be located.
    #[error("No header row detected in sheet '{0}'")]
    NoHeaderDetected(String),

    /// The header row exists but carries no usable labels.
    #[error("No valid headers found in sheet '{0}'")]
    NoValidHeaders(String),

    /// A column name is not present in the frame.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// A rule name is neither built in nor present in the catalog.
    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    /// A rule descriptor could not be turned into an evaluable rule.
    #[error("Invalid rule '{name}': {message}")]
    InvalidRule { name: String, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GridcheckError {
    /// Wrap an IO error with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GridcheckError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for gridcheck operations.
pub type Result<T> = std::result::Result<T, GridcheckError>;
