//! Error type shared by the store, the service layer and JSON export.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("review item not found: {owner}/{item_key}")]
    NotFound { owner: String, item_key: String },

    #[error("review item {owner}/{item_key} changed since version {expected} was read")]
    Conflict {
        owner: String,
        item_key: String,
        expected: i64,
    },

    #[error("invalid review state: {0}")]
    InvalidState(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("review store lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, ReviewError>;
