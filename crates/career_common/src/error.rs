//! Error types for the career service.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareerError {
    /// Request payload failed validation (missing fields, bad coercions).
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness constraint was violated (duplicate career or step name).
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CareerError {
    pub fn validation(message: impl Into<String>) -> Self {
        CareerError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CareerError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        CareerError::Conflict(message.into())
    }
}
