//! File service: assigns project ids and delegates to the storage repository.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use archive::UploadedArchive;
use fm_common::FmResult;
use storage::{StorageRepository, UploadResults};

/// Result of an upload request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub project_id: String,
    pub upload_results: UploadResults,
}

/// Service layer over a [`StorageRepository`].
#[derive(Clone)]
pub struct FileService {
    repository: Arc<dyn StorageRepository>,
}

impl FileService {
    pub fn new(repository: Arc<dyn StorageRepository>) -> Self {
        Self { repository }
    }

    /// Upload a local directory, generating a project id if none was given.
    pub async fn upload_directory(
        &self,
        project_id: Option<String>,
        local_dir: Option<&str>,
    ) -> FmResult<UploadResponse> {
        let project_id = resolve_project_id(project_id);
        let upload_results = self
            .repository
            .upload_directory(Some(&project_id), local_dir)
            .await?;

        Ok(UploadResponse {
            project_id,
            upload_results,
        })
    }

    /// Upload the contents of a zip archive, generating a project id if none
    /// was given.
    pub async fn upload_zip_file(
        &self,
        project_id: Option<String>,
        archive: Option<UploadedArchive>,
    ) -> FmResult<UploadResponse> {
        let project_id = resolve_project_id(project_id);
        let upload_results = self
            .repository
            .upload_archive(Some(&project_id), archive)
            .await?;

        Ok(UploadResponse {
            project_id,
            upload_results,
        })
    }

    pub async fn list_files(&self, project_id: Option<&str>) -> FmResult<Vec<String>> {
        self.repository.list_files(project_id).await
    }

    pub async fn get_file_content(
        &self,
        project_id: Option<&str>,
        file_path: Option<&str>,
    ) -> FmResult<String> {
        self.repository.get_file_content(project_id, file_path).await
    }
}

/// Keep a caller-supplied id, or mint a random UUID for a blank one.
fn resolve_project_id(project_id: Option<String>) -> String {
    match project_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            let id = Uuid::new_v4().to_string();
            info!(project_id = %id, "Generated project ID");
            id
        }
    }
}
