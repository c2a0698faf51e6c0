//! Directory walking for upload batches.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use fm_common::{FileManagerError, FmResult};

/// Recursively list the regular files under `directory`.
///
/// Entries are visited in file-name order so batches are deterministic.
/// Symbolic links are not followed and are not returned.
pub fn files_from_directory(directory: &Path) -> FmResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            FileManagerError::not_found(format!("Failed to read files from directory: {}", e))
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Fail when an upload batch would be empty.
pub fn validate_files_exist(files: &[PathBuf]) -> FmResult<()> {
    if files.is_empty() {
        return Err(FileManagerError::invalid_input(
            "No files found in the directory to upload.",
        ));
    }
    Ok(())
}
