//! Error types for airq-store.

use std::path::PathBuf;

/// Result type for airq-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in airq-store.
///
/// Absent records are never an error: lookups resolve to `None` or an empty
/// collection instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The database could not be opened or its schema could not be set up.
    #[error("Storage unavailable at {location}: {source}")]
    StorageUnavailable {
        location: String,
        source: rusqlite::Error,
    },

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Operation attempted on a store that is not open.
    #[error("Store is closed")]
    StoreClosed,

    /// The database engine reported a failure for a specific operation.
    #[error("Database error during {operation}: {source}")]
    Engine {
        operation: &'static str,
        source: rusqlite::Error,
    },

    /// A payload could not be converted to or from JSON.
    #[error("Serialization error during {operation}: {source}")]
    Serialization {
        operation: &'static str,
        source: serde_json::Error,
    },

    /// A stored timestamp or date could not be decoded.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Tags engine and serialization failures with the operation being attempted.
pub(crate) trait OperationContext<T> {
    fn during(self, operation: &'static str) -> Result<T>;
}

impl<T> OperationContext<T> for std::result::Result<T, rusqlite::Error> {
    fn during(self, operation: &'static str) -> Result<T> {
        self.map_err(|source| Error::Engine { operation, source })
    }
}

impl<T> OperationContext<T> for std::result::Result<T, serde_json::Error> {
    fn during(self, operation: &'static str) -> Result<T> {
        self.map_err(|source| Error::Serialization { operation, source })
    }
}
