use thiserror::Error;

use crate::entity::IdeaStatus;

#[derive(Error, Debug)]
pub enum IdeaflowError {
    #[error("Not in an ideaflow project. Run 'ideaflow init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .ideaflow/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Idea not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {reason}")]
    InvalidTransition {
        from: IdeaStatus,
        to: IdeaStatus,
        reason: String,
    },

    #[error("{message}")]
    InvalidComment { outcome: IdeaStatus, message: String },

    #[error("Idea {0} already has an attachment. Remove it first to upload a new one.")]
    DuplicateAttachment(String),

    #[error("Validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, IdeaflowError>;
