//! Object storage client abstraction.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageResult;

/// Minimal object storage operations the file manager relies on.
///
/// Implementations own bucket selection, credentials and any wire-level
/// retries; callers only see keys.
#[async_trait]
pub trait ObjectClient: Send + Sync {
    /// Store `data` under `key`, replacing any existing object.
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Fetch the full contents of `key`.
    ///
    /// Returns [`StorageError::NotFound`](crate::StorageError::NotFound)
    /// when the key does not exist.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// List every key under `prefix`, in storage listing order.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Check if an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;
}
