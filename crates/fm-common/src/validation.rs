//! Input validation for project ids, paths and archive entries.
//!
//! Every check fails with [`FileManagerError::InvalidInput`]. The zip entry
//! check runs before any byte of the entry is written.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{FileManagerError, FmResult};

/// Validate that a project id is present and not blank.
pub fn validate_project_id(project_id: Option<&str>) -> FmResult<&str> {
    match project_id {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(FileManagerError::invalid_input(
            "Project ID cannot be null or empty.",
        )),
    }
}

/// Validate that a relative file path is present and not blank.
pub fn validate_file_path(file_path: Option<&str>) -> FmResult<&str> {
    match file_path {
        Some(path) if !path.trim().is_empty() => Ok(path),
        _ => Err(FileManagerError::invalid_input(
            "File path cannot be null or empty.",
        )),
    }
}

/// Validate a local directory and return its resolved path.
pub fn validate_directory(local_dir: Option<&str>) -> FmResult<PathBuf> {
    let local_dir = local_dir.unwrap_or_default();
    let invalid = || FileManagerError::invalid_input(format!("Invalid local directory: {}", local_dir));

    if local_dir.trim().is_empty() {
        return Err(invalid());
    }

    let directory = Path::new(local_dir);
    match fs::metadata(directory) {
        Ok(meta) if meta.is_dir() => fs::canonicalize(directory).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Resolve a zip entry name under `target_dir`, rejecting anything that
/// would land outside of it or onto a symbolic link.
///
/// Returns the normalized destination path.
pub fn validate_and_resolve_path(entry_name: &str, target_dir: &Path) -> FmResult<PathBuf> {
    let root = lexical_normalize(target_dir);
    let resolved = lexical_normalize(&target_dir.join(entry_name));

    if !resolved.starts_with(&root) {
        return Err(FileManagerError::invalid_input(format!(
            "Invalid ZIP entry: {}",
            entry_name
        )));
    }

    let is_symlink = fs::symlink_metadata(&resolved)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if is_symlink {
        return Err(FileManagerError::invalid_input(format!(
            "ZIP entry contains a symbolic link: {}",
            entry_name
        )));
    }

    Ok(resolved)
}

/// Lexical path normalization without filesystem access.
///
/// Removes `.` components and resolves `..` components lexically. A `..`
/// that cannot be popped is kept, so the result still escapes its base.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `/..` is still `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
