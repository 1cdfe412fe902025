// pwmsg — Top-level error types
//
// Wraps store errors for the application boundary.

use thiserror::Error;

/// Top-level error type for all pwmsg operations.
#[derive(Debug, Error)]
pub enum PwmsgError {
    #[error("{0}")]
    Store(#[from] crate::store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PwmsgError>;
