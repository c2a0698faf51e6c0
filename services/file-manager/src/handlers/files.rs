//! Listing and retrieval handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};

use super::FileManagerQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /fileManager/files?projectId= - List a project's storage keys
pub async fn list_files_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<FileManagerQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let keys = state.files.list_files(query.project_id.as_deref()).await?;
    Ok(Json(keys))
}

/// GET /fileManager/file?projectId=&filePath= - Read one file as text
pub async fn get_file_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<FileManagerQuery>,
) -> Result<String, ApiError> {
    let content = state
        .files
        .get_file_content(query.project_id.as_deref(), query.file_path.as_deref())
        .await?;
    Ok(content)
}
