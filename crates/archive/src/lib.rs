//! Archive extraction and directory walking for project uploads.
//!
//! Provides:
//! - Zip extraction into owner-only temp roots, with zip-slip and symlink
//!   guards applied per entry
//! - Recursive listing of the regular files of an upload tree
//!
//! Everything here is blocking filesystem code; async callers should run it
//! on a blocking thread.

pub mod extract;
pub mod walk;

pub use extract::{
    extract_zip, process_and_extract_zip, validate_archive, ExtractedArchive, UploadedArchive,
};
pub use walk::{files_from_directory, validate_files_exist};
