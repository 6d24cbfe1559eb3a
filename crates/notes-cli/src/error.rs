use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] notes_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error("Nothing to update; pass --subject, --type, or --content")]
    NothingToUpdate,
    #[error("{0}")]
    Rejected(String),
    #[error("Listener cancelled: {0}")]
    ListenerCancelled(String),
    #[error("Invalid sample on line {line}: {message}")]
    InvalidSample { line: usize, message: String },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error(
        "Anonymous auth is not configured. Run `notes config init --api-key <KEY>` or set NOTES_API_KEY."
    )]
    AuthNotConfigured,
}
