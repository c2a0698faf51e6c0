//! Shared test utilities for the file manager workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Scratch directory helpers
//! - Sample upload trees
//! - In-memory zip archive builders (benign and malicious)
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{zip_bytes, ZipEntrySpec};
//! ```

pub mod fixtures;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use paths::*;
