//! Upload handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Multipart, Query},
    Json,
};
use tracing::{debug, instrument};

use archive::UploadedArchive;
use fm_common::FileManagerError;

use super::FileManagerQuery;
use crate::error::ApiError;
use crate::service::UploadResponse;
use crate::state::AppState;

/// Multipart field carrying the archive.
pub const FILE_FIELD: &str = "file";

/// Optional multipart field carrying the project id.
pub const PROJECT_ID_FIELD: &str = "projectId";

/// POST /fileManager/upload?localDir=[&projectId=] - Upload a local directory
#[instrument(skip(state))]
pub async fn upload_directory_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<FileManagerQuery>,
) -> Result<Json<UploadResponse>, ApiError> {
    let response = state
        .files
        .upload_directory(query.project_id, query.local_dir.as_deref())
        .await?;
    Ok(Json(response))
}

/// POST /fileManager/upload-zip[?projectId=] - Upload a zip archive
///
/// A non-blank `projectId` query parameter takes precedence over the
/// multipart field.
#[instrument(skip(state, multipart))]
pub async fn upload_zip_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<FileManagerQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut project_id = query.project_id.filter(|id| !id.trim().is_empty());
    let mut archive = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);

        match name.as_deref() {
            Some(FILE_FIELD) => {
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                debug!(file_name = ?file_name, size = data.len(), "Received archive");
                archive = Some(UploadedArchive::new(file_name, data));
            }
            Some(PROJECT_ID_FIELD) => {
                let value = field.text().await.map_err(multipart_error)?;
                if project_id.is_none() && !value.trim().is_empty() {
                    project_id = Some(value);
                }
            }
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    let response = state.files.upload_zip_file(project_id, archive).await?;
    Ok(Json(response))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    FileManagerError::invalid_input(format!("Failed to read multipart request: {}", e)).into()
}
