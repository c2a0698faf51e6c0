//! Zip extraction into per-request temporary directories.
//!
//! An uploaded archive is written into a fresh owner-only temp root and
//! unpacked into a `contents` directory beside it, so the archive file is
//! never part of the walked tree. Every entry is validated against the
//! target before any byte of it is written.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use metrics::counter;
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};
use zip::ZipArchive;

use fm_common::{sanitize_file_name, validate_and_resolve_path, FileManagerError, FmResult};

const TEMP_PREFIX: &str = "unpacked-zip";
const ARCHIVE_DIR: &str = "archive";
const CONTENTS_DIR: &str = "contents";
const DEFAULT_ARCHIVE_NAME: &str = "uploaded.zip";

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// An archive payload received from a client.
#[derive(Debug, Clone)]
pub struct UploadedArchive {
    /// File name declared by the client, untrusted.
    pub file_name: Option<String>,
    /// Raw archive bytes.
    pub data: Bytes,
}

impl UploadedArchive {
    pub fn new(file_name: Option<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name,
            data: data.into(),
        }
    }

    /// Name the archive is stored under inside the temp root.
    pub fn sanitized_name(&self) -> String {
        let name = self
            .file_name
            .as_deref()
            .map(sanitize_file_name)
            .unwrap_or_default();

        match name.as_str() {
            "" | "." | ".." => DEFAULT_ARCHIVE_NAME.to_string(),
            _ => name,
        }
    }
}

/// Validate that an archive was supplied and is not empty.
pub fn validate_archive(archive: Option<UploadedArchive>) -> FmResult<UploadedArchive> {
    match archive {
        Some(archive) if !archive.data.is_empty() => Ok(archive),
        _ => Err(FileManagerError::invalid_input(
            "Uploaded ZIP file is null or empty.",
        )),
    }
}

/// A materialized archive living in its own temp root.
///
/// Dropping the guard removes the temp root; [`ExtractedArchive::cleanup`]
/// does the same but reports failures.
#[derive(Debug)]
pub struct ExtractedArchive {
    root: TempDir,
    contents: PathBuf,
    entries: usize,
}

impl ExtractedArchive {
    /// Directory holding the extracted entries.
    pub fn path(&self) -> &Path {
        &self.contents
    }

    /// Temp root owning both the archive copy and the extracted entries.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Number of archive entries processed.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Recursively delete the temp root.
    pub fn cleanup(self) -> FmResult<()> {
        let root = self.root.path().to_path_buf();
        self.root.close().map_err(|e| {
            FileManagerError::invalid_input(format!("Failed to clean up temporary files: {}", e))
        })?;
        debug!(root = %root.display(), "Removed extraction root");
        Ok(())
    }
}

/// Write an uploaded archive into a fresh owner-only temp directory and
/// extract it there.
///
/// `temp_parent` selects where the temp root is created; `None` uses the
/// system temp directory. On error the temp root is removed before
/// returning.
#[instrument(skip(archive), fields(file_name = ?archive.file_name, size = archive.data.len()))]
pub fn process_and_extract_zip(
    archive: &UploadedArchive,
    temp_parent: Option<&Path>,
) -> FmResult<ExtractedArchive> {
    let process_err =
        |e: io::Error| FileManagerError::invalid_input(format!("Failed to process ZIP file: {}", e));

    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_PREFIX);
    let root = match temp_parent {
        Some(parent) => builder.tempdir_in(parent),
        None => builder.tempdir(),
    }
    .map_err(process_err)?;
    restrict_to_owner(root.path()).map_err(process_err)?;

    let archive_dir = root.path().join(ARCHIVE_DIR);
    let contents = root.path().join(CONTENTS_DIR);
    fs::create_dir(&archive_dir).map_err(process_err)?;
    fs::create_dir(&contents).map_err(process_err)?;
    restrict_to_owner(&contents).map_err(process_err)?;

    let archive_path = archive_dir.join(archive.sanitized_name());
    fs::write(&archive_path, &archive.data).map_err(process_err)?;

    let entries = extract_zip(&archive_path, &contents)?;

    info!(
        root = %root.path().display(),
        entries = entries,
        "Extracted uploaded archive"
    );

    Ok(ExtractedArchive {
        root,
        contents,
        entries,
    })
}

/// Extract a zip archive into `target_dir`, entry by entry in archive order.
///
/// Fails the whole extraction on the first entry that escapes the target or
/// is a symbolic link. Existing files are overwritten. There is no rollback:
/// a failure leaves whatever was written so far for the caller to discard.
#[instrument(skip_all, fields(archive = %archive_path.display(), target = %target_dir.display()))]
pub fn extract_zip(archive_path: &Path, target_dir: &Path) -> FmResult<usize> {
    let file = File::open(archive_path).map_err(extract_err)?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(extract_err)?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(extract_err)?;
        let name = entry.name().to_string();

        let destination = validate_and_resolve_path(&name, target_dir)?;
        if is_symlink_mode(entry.unix_mode()) {
            warn!(entry = %name, "Rejecting symbolic link entry");
            return Err(FileManagerError::invalid_input(format!(
                "ZIP entry contains a symbolic link: {}",
                name
            )));
        }

        if entry.is_dir() {
            fs::create_dir_all(&destination).map_err(extract_err)?;
        } else {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent).map_err(extract_err)?;
            }
            let mut out = File::create(&destination).map_err(extract_err)?;
            let written = io::copy(&mut entry, &mut out).map_err(extract_err)?;
            debug!(entry = %name, size = written, "Extracted entry");
        }
    }

    counter!("fm_archives_extracted_total").increment(1);
    Ok(zip.len())
}

fn extract_err(e: impl std::fmt::Display) -> FileManagerError {
    FileManagerError::invalid_input(format!("Error extracting ZIP file: {}", e))
}

fn is_symlink_mode(mode: Option<u32>) -> bool {
    mode.is_some_and(|mode| mode & S_IFMT == S_IFLNK)
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> io::Result<()> {
    Ok(())
}
