//! Project file repository: the upload pipeline plus listing and retrieval.
//!
//! Uploads are strictly sequential, one put per local file in walk order.
//! The first failed put aborts the batch; no partial result is returned.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use metrics::counter;
use tracing::{debug, info, instrument, warn};

use archive::{
    files_from_directory, process_and_extract_zip, validate_archive, validate_files_exist,
    UploadedArchive,
};
use fm_common::{
    generate_key, object_key, project_prefix, validate_directory, validate_file_path,
    validate_project_id, FileManagerError, FmResult,
};

use crate::client::ObjectClient;
use crate::error::StorageError;

/// Status recorded for every stored object.
pub const UPLOADED: &str = "Uploaded";

/// Storage key to upload status, one entry per processed file.
pub type UploadResults = BTreeMap<String, String>;

/// Storage repository operations for project files.
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// Upload every regular file under a local directory into the project.
    async fn upload_directory(
        &self,
        project_id: Option<&str>,
        local_dir: Option<&str>,
    ) -> FmResult<UploadResults>;

    /// Extract a zip archive and upload its files into the project.
    async fn upload_archive(
        &self,
        project_id: Option<&str>,
        archive: Option<UploadedArchive>,
    ) -> FmResult<UploadResults>;

    /// List all keys stored for a project.
    async fn list_files(&self, project_id: Option<&str>) -> FmResult<Vec<String>>;

    /// Read one project file as UTF-8 text.
    async fn get_file_content(
        &self,
        project_id: Option<&str>,
        file_path: Option<&str>,
    ) -> FmResult<String>;
}

/// Repository backed by an [`ObjectClient`].
pub struct ObjectStoreRepository {
    client: Arc<dyn ObjectClient>,
    temp_dir: Option<PathBuf>,
}

impl ObjectStoreRepository {
    pub fn new(client: Arc<dyn ObjectClient>) -> Self {
        Self {
            client,
            temp_dir: None,
        }
    }

    /// Create extraction roots under `temp_dir` instead of the system temp dir.
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(temp_dir.into());
        self
    }

    /// Walk `base_dir` and put each regular file under the project prefix.
    async fn upload_tree(&self, project_id: &str, base_dir: &Path) -> FmResult<UploadResults> {
        let walk_root = base_dir.to_path_buf();
        let files = tokio::task::spawn_blocking(move || -> FmResult<Vec<PathBuf>> {
            let files = files_from_directory(&walk_root)?;
            validate_files_exist(&files)?;
            Ok(files)
        })
        .await
        .map_err(join_error)??;

        let mut results = UploadResults::new();

        for file in &files {
            let key = generate_key(project_id, base_dir, file)?;

            let data = tokio::fs::read(file).await.map_err(|e| {
                FileManagerError::not_found(format!(
                    "Failed to read files from directory: {}",
                    e
                ))
            })?;
            let size = data.len() as u64;

            if let Err(e) = self.client.put(&key, Bytes::from(data)).await {
                counter!("fm_upload_failures_total").increment(1);
                warn!(
                    key = %key,
                    error = %e,
                    uploaded = results.len(),
                    remaining = files.len() - results.len(),
                    "Upload failed, aborting batch"
                );
                return Err(FileManagerError::UploadError(format!(
                    "Failed to upload files to storage: {}",
                    e
                )));
            }

            counter!("fm_objects_uploaded_total").increment(1);
            counter!("fm_uploaded_bytes_total").increment(size);
            debug!(key = %key, size = size, "Uploaded file");

            results.insert(key, UPLOADED.to_string());
        }

        Ok(results)
    }
}

#[async_trait]
impl StorageRepository for ObjectStoreRepository {
    #[instrument(skip(self))]
    async fn upload_directory(
        &self,
        project_id: Option<&str>,
        local_dir: Option<&str>,
    ) -> FmResult<UploadResults> {
        let project_id = validate_project_id(project_id)?;
        let local_dir = local_dir.map(str::to_string);
        let directory =
            tokio::task::spawn_blocking(move || validate_directory(local_dir.as_deref()))
                .await
                .map_err(join_error)??;

        let results = self.upload_tree(project_id, &directory).await?;

        info!(
            project_id = %project_id,
            files = results.len(),
            "Uploaded directory"
        );
        Ok(results)
    }

    #[instrument(skip(self, archive))]
    async fn upload_archive(
        &self,
        project_id: Option<&str>,
        archive: Option<UploadedArchive>,
    ) -> FmResult<UploadResults> {
        let project_id = validate_project_id(project_id)?;
        let archive = validate_archive(archive)?;

        let temp_dir = self.temp_dir.clone();
        let extracted = tokio::task::spawn_blocking(move || {
            process_and_extract_zip(&archive, temp_dir.as_deref())
        })
        .await
        .map_err(join_error)??;

        let outcome = self.upload_tree(project_id, extracted.path()).await;

        let cleanup = tokio::task::spawn_blocking(move || extracted.cleanup())
            .await
            .map_err(join_error)
            .and_then(|result| result);

        match (outcome, cleanup) {
            (Ok(results), Ok(())) => {
                info!(
                    project_id = %project_id,
                    files = results.len(),
                    "Uploaded archive"
                );
                Ok(results)
            }
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(cleanup_err)) => {
                warn!(error = %cleanup_err, "Failed to remove extraction root");
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    async fn list_files(&self, project_id: Option<&str>) -> FmResult<Vec<String>> {
        let project_id = validate_project_id(project_id)?;
        let prefix = project_prefix(project_id);

        let keys = self
            .client
            .list(&prefix)
            .await
            .map_err(|e| match e {
                StorageError::InvalidKey(_) => FileManagerError::invalid_input(e.to_string()),
                e => FileManagerError::ListError(format!("Failed to list files: {}", e)),
            })?;

        if keys.is_empty() {
            return Err(FileManagerError::not_found(format!(
                "No files found for project ID: {}",
                project_id
            )));
        }

        Ok(keys)
    }

    #[instrument(skip(self))]
    async fn get_file_content(
        &self,
        project_id: Option<&str>,
        file_path: Option<&str>,
    ) -> FmResult<String> {
        let project_id = validate_project_id(project_id)?;
        let file_path = validate_file_path(file_path)?;
        let key = object_key(project_id, file_path);

        let bytes = match self.client.get(&key).await {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => {
                return Err(FileManagerError::not_found(format!(
                    "File not found: {}",
                    file_path
                )))
            }
            Err(e @ StorageError::InvalidKey(_)) => {
                return Err(FileManagerError::invalid_input(e.to_string()))
            }
            Err(e) => {
                return Err(FileManagerError::ReadError(format!(
                    "Failed to retrieve file: {}",
                    e
                )))
            }
        };

        String::from_utf8(bytes.to_vec()).map_err(|e| {
            FileManagerError::ReadError(format!("Error reading file content: {}", e))
        })
    }
}

fn join_error(e: tokio::task::JoinError) -> FileManagerError {
    FileManagerError::InternalError(format!("Blocking task failed: {}", e))
}
