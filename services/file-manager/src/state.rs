//! Application state for the file manager service.

use std::sync::Arc;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use storage::{ObjectClient, ObjectStorage, ObjectStorageConfig, ObjectStoreRepository};

use crate::config::ServiceConfig;
use crate::service::FileService;

/// Shared application state.
pub struct AppState {
    /// Upload, listing and retrieval operations.
    pub files: FileService,

    /// Raw storage client, used by the readiness probe.
    pub storage: Arc<dyn ObjectClient>,

    /// Prometheus exporter handle; `None` when no recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        storage: Arc<dyn ObjectClient>,
        config: &ServiceConfig,
        prometheus: Option<PrometheusHandle>,
    ) -> Self {
        let mut repository = ObjectStoreRepository::new(Arc::clone(&storage));
        if let Some(temp_dir) = &config.temp_dir {
            repository = repository.with_temp_dir(temp_dir.clone());
        }

        Self {
            files: FileService::new(Arc::new(repository)),
            storage,
            prometheus,
        }
    }

    /// Create state backed by the bucket configured in the environment.
    pub fn from_env(config: &ServiceConfig, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        let storage_config = ObjectStorageConfig::from_env()?;
        info!(
            bucket = %storage_config.bucket,
            region = %storage_config.region,
            endpoint = ?storage_config.endpoint,
            "Connecting to object storage"
        );

        let storage = ObjectStorage::new(&storage_config)?;
        Ok(Self::new(Arc::new(storage), config, prometheus))
    }
}
