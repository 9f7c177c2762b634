//! Error types for tablica.

use thiserror::Error;

/// Errors that can occur in tablica operations.
#[derive(Error, Debug)]
pub enum TablicaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for tablica operations.
pub type TablicaResult<T> = Result<T, TablicaError>;

impl From<reqwest::Error> for TablicaError {
    fn from(err: reqwest::Error) -> Self {
        TablicaError::Feed(err.to_string())
    }
}
