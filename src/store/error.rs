// pwmsg — Store error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A record was rejected before any mutation (e.g. empty password).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Import payload was not a JSON array of records.
    #[error("Format error: {0}")]
    Format(String),

    #[error("No record at index {index} (store holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The durable slot could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
