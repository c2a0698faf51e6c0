//! Error types for the storage crate.

use thiserror::Error;

/// Errors raised by an object storage client.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("{0}")]
    Client(String),

    #[error("Invalid storage configuration: {0}")]
    Config(String),
}

/// Result type for storage client operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
