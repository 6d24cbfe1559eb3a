//! Error types for notes-core

use thiserror::Error;

use crate::auth::AuthError;

/// Result type alias using notes-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in notes-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Realtime database API error
    #[error("Database API error: {0}")]
    Api(String),

    /// Live subscription stream error
    #[error("Stream error: {0}")]
    Stream(String),

    /// Local SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication error
    #[error(transparent)]
    Auth(#[from] AuthError),
}
