//! Error types for glossa.

use thiserror::Error;

/// Result type alias using glossa's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for glossa operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transcript not found
    #[error("Transcript not found: {0}")]
    TranscriptNotFound(uuid::Uuid),

    /// Invalid input (line scope, missing configuration)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Workspace generation quota exhausted
    #[error("Generation quota exhausted ({used}/{limit})")]
    QuotaExceeded { used: i32, limit: i32 },

    /// Model endpoint failed (transport or non-2xx response)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Model output did not yield valid JSON of the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (authenticated but not authorized)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Upstream(e.to_string())
    }
}
