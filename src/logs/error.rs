use thiserror::Error;

/// Failure while writing the log collection to its backing store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum LogError {
    /// Caller input was rejected; never retried
    #[error("{0}")]
    Validation(String),

    /// The collection could not be saved; the new entry was discarded
    #[error("Failed to persist log collection: {0}")]
    Persistence(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, LogError>;
