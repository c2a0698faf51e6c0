//! HTTP request handlers.

pub mod files;
pub mod health;
pub mod upload;

use serde::Deserialize;

/// Query parameters accepted by the `/fileManager` routes.
///
/// Every field is optional so that missing parameters reach the validators
/// and produce structured errors.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileManagerQuery {
    pub project_id: Option<String>,
    pub local_dir: Option<String>,
    pub file_path: Option<String>,
}
