//! Object storage client backed by the `object_store` crate (S3 compatible).

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::{aws::AmazonS3Builder, memory::InMemory, path::Path, ObjectStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::client::ObjectClient;
use crate::error::{StorageError, StorageResult};

/// Configuration for object storage connection.
#[derive(Clone, Serialize, Deserialize)]
pub struct ObjectStorageConfig {
    /// Custom endpoint URL for S3-compatible stores; `None` uses AWS.
    pub endpoint: Option<String>,
    /// Bucket name
    pub bucket: String,
    /// Access key ID; `None` falls back to the ambient AWS credential chain
    pub access_key_id: Option<String>,
    /// Secret access key
    pub secret_access_key: Option<String>,
    /// AWS region
    pub region: String,
    /// Allow plain HTTP endpoints (local MinIO and friends)
    pub allow_http: bool,
}

impl ObjectStorageConfig {
    /// Load configuration from the `AWS_*` / `S3_*` environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let bucket = std::env::var("AWS_BUCKET_NAME")
            .ok()
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| StorageError::Config("AWS_BUCKET_NAME is not set".to_string()))?;

        Ok(Self {
            endpoint: std::env::var("S3_ENDPOINT").ok(),
            bucket,
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            allow_http: std::env::var("S3_ALLOW_HTTP")
                .map(|v| v == "true")
                .unwrap_or(false),
        })
    }
}

impl fmt::Debug for ObjectStorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStorageConfig")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("region", &self.region)
            .field("allow_http", &self.allow_http)
            .finish()
    }
}

/// Object storage client for project files.
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ObjectStorage {
    /// Create a new S3 client from config.
    pub fn new(config: &ObjectStorageConfig) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_region(&config.region);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }
        if let Some(access_key_id) = &config.access_key_id {
            builder = builder.with_access_key_id(access_key_id);
        }
        if let Some(secret_access_key) = &config.secret_access_key {
            builder = builder.with_secret_access_key(secret_access_key);
        }
        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::Config(format!("Failed to create S3 client: {}", e)))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: config.bucket.clone(),
        })
    }

    /// Create a client over an in-process store, for local runs and tests.
    pub fn in_memory(bucket: &str) -> Self {
        Self::from_store(Arc::new(InMemory::new()), bucket)
    }

    /// Wrap an existing `ObjectStore`.
    pub fn from_store(store: Arc<dyn ObjectStore>, bucket: &str) -> Self {
        Self {
            store,
            bucket: bucket.to_string(),
        }
    }

    /// Bucket this client is bound to.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Parse a storage key verbatim, without the percent-encoding `Path::from`
/// applies. Empty, `.` and `..` segments are rejected.
fn parse_key(key: &str) -> StorageResult<Path> {
    Path::parse(key).map_err(|e| StorageError::InvalidKey(format!("{}: {}", key, e)))
}

#[async_trait]
impl ObjectClient for ObjectStorage {
    #[instrument(skip(self, data), fields(bucket = %self.bucket, key = %key))]
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        let location = parse_key(key)?;
        debug!(size = data.len(), "Writing object");

        self.store
            .put(&location, data.into())
            .await
            .map_err(|e| StorageError::Client(format!("Failed to write {}: {}", key, e)))?;

        Ok(())
    }

    #[instrument(skip(self), fields(bucket = %self.bucket, key = %key))]
    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let location = parse_key(key)?;

        let result = self.store.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StorageError::NotFound(key.to_string()),
            e => StorageError::Client(format!("Failed to read {}: {}", key, e)),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::Client(format!("Failed to read bytes: {}", e)))?;

        debug!(size = bytes.len(), "Read object");
        Ok(bytes)
    }

    #[instrument(skip(self), fields(bucket = %self.bucket, prefix = %prefix))]
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let prefix_path = parse_key(prefix)?;
        let mut keys = Vec::new();

        let mut stream = self.store.list(Some(&prefix_path));
        while let Some(meta) = stream
            .try_next()
            .await
            .map_err(|e| StorageError::Client(format!("List failed: {}", e)))?
        {
            keys.push(meta.location.to_string());
        }

        debug!(count = keys.len(), "Listed objects");
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let location = parse_key(key)?;

        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::Client(format!(
                "Failed to check {}: {}",
                key, e
            ))),
        }
    }
}
