//! Error types for SolveAI.

use thiserror::Error;

/// Result type alias using SolveAI's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for SolveAI operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Local catalog store rejected an operation (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Folder not found
    #[error("Folder not found: {0}")]
    FolderNotFound(uuid::Uuid),

    /// Invalid input (client request malformed or missing fields)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error (credential absent, bad settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The model returned no text at all
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// The model returned text that is not the JSON contract
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Inference/generation failed
    #[error("Inference error: {0}")]
    Inference(String),
}

impl Error {
    /// True for errors caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }

    /// True for lookups that found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::FolderNotFound(_))
    }
}
