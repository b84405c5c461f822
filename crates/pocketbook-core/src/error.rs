//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] pocketbook_storage::StorageError),

    #[error("Session error: {0}")]
    Session(#[from] pocketbook_session::SessionError),

    /// Displays the API message unchanged so it can be shown as-is.
    #[error(transparent)]
    Api(#[from] pocketbook_api::ApiError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
