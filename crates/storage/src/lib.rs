//! Storage abstractions for the file manager.
//!
//! Provides:
//! - An object storage client trait and its `object_store` (S3/in-memory)
//!   implementation
//! - The project repository: directory/archive upload, listing, retrieval

pub mod client;
pub mod error;
pub mod object_store;
pub mod repository;

pub use self::object_store::{ObjectStorage, ObjectStorageConfig};
pub use client::ObjectClient;
pub use error::{StorageError, StorageResult};
pub use repository::{ObjectStoreRepository, StorageRepository, UploadResults, UPLOADED};
