//! Common types and utilities shared across the file manager crates.

pub mod error;
pub mod key;
pub mod validation;

pub use error::{FileManagerError, FmResult};
pub use key::{generate_key, object_key, project_prefix, to_posix_path, PROJECTS_ROOT};
pub use validation::{
    lexical_normalize, sanitize_file_name, validate_and_resolve_path, validate_directory,
    validate_file_path, validate_project_id,
};
