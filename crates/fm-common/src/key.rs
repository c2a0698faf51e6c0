//! Storage key layout for project files.

use std::path::{Component, Path};

use crate::error::{FileManagerError, FmResult};

/// Root namespace under which every project prefix lives.
pub const PROJECTS_ROOT: &str = "projects";

/// Build the prefix that groups a project's objects.
/// Format: projects/{project_id}/
pub fn project_prefix(project_id: &str) -> String {
    format!("{}/{}/", PROJECTS_ROOT, project_id)
}

/// Build the key of a file inside a project from a caller-supplied relative path.
/// Format: projects/{project_id}/{file_path}
pub fn object_key(project_id: &str, file_path: &str) -> String {
    format!("{}/{}/{}", PROJECTS_ROOT, project_id, file_path)
}

/// Generate the storage key for `file`, which must live under `base_dir`.
///
/// The relative part always uses forward slashes, whatever the host
/// separator is.
pub fn generate_key(project_id: &str, base_dir: &Path, file: &Path) -> FmResult<String> {
    let relative = file.strip_prefix(base_dir).map_err(|_| {
        FileManagerError::InternalError(format!(
            "{} is not under {}",
            file.display(),
            base_dir.display()
        ))
    })?;

    Ok(object_key(project_id, &to_posix_path(relative)))
}

/// Convert a path to a POSIX-style string (forward slashes).
pub fn to_posix_path(path: &Path) -> String {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
