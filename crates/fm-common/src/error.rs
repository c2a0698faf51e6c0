//! Error types for file manager operations.

use thiserror::Error;

/// Result type alias using FileManagerError.
pub type FmResult<T> = Result<T, FileManagerError>;

/// Primary error type for file manager operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FileManagerError {
    // === Client Errors ===
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    // === Storage Errors ===
    #[error("{0}")]
    UploadError(String),

    #[error("{0}")]
    ListError(String),

    #[error("{0}")]
    ReadError(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl FileManagerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        FileManagerError::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        FileManagerError::NotFound(message.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            FileManagerError::InvalidInput(_)
            | FileManagerError::UploadError(_)
            | FileManagerError::ReadError(_) => 400,

            FileManagerError::NotFound(_) => 404,

            FileManagerError::ListError(_) | FileManagerError::InternalError(_) => 500,
        }
    }

    /// Short machine-readable kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FileManagerError::InvalidInput(_) => "invalid_input",
            FileManagerError::NotFound(_) => "not_found",
            FileManagerError::UploadError(_) => "upload_error",
            FileManagerError::ListError(_) => "list_error",
            FileManagerError::ReadError(_) => "read_error",
            FileManagerError::InternalError(_) => "internal",
        }
    }

    /// The message carried by the error, without any prefix.
    pub fn message(&self) -> &str {
        match self {
            FileManagerError::InvalidInput(m)
            | FileManagerError::NotFound(m)
            | FileManagerError::UploadError(m)
            | FileManagerError::ListError(m)
            | FileManagerError::ReadError(m)
            | FileManagerError::InternalError(m) => m,
        }
    }
}
