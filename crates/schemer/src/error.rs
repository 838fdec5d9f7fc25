//! Error types for the schemer library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for schemer operations.
///
/// Structural problems (missing entities during a transform, malformed
/// configuration or analysis records) are fatal and abort the run.
/// Per-row data violations never surface here; they are resolved by the
/// configured policies.
#[derive(Debug, Error)]
pub enum SchemerError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Empty input or nothing to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A transform referenced a table that is not in the database.
    #[error("Table '{table}' not found in the database")]
    MissingTable { table: String },

    /// A transform referenced a column that is not in its table.
    #[error("Column '{column}' not found in table '{table}'")]
    MissingColumn { table: String, column: String },

    /// A transform required a unique column the table does not have.
    #[error("Table '{table}' has no unique column")]
    MissingUnique { table: String },

    /// Inserting a table under a name that is already taken.
    #[error("Table '{table}' already exists in the database")]
    DuplicateTable { table: String },

    /// A column did not hold the cell type a transform expected.
    #[error("Column '{column}' in table '{table}' has an unexpected type")]
    ColumnTypeMismatch { table: String, column: String },

    /// Renaming columns would produce a duplicate name.
    #[error("Renaming column '{column}' in table '{table}' collides with an existing column")]
    DuplicateColumn { table: String, column: String },

    /// Persisted analysis record empty or otherwise unusable.
    #[error("Malformed analysis record: {0}")]
    MalformedRecord(String),
}

/// Result type alias for schemer operations.
pub type Result<T> = std::result::Result<T, SchemerError>;
