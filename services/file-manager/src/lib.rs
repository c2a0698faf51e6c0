//! File Manager Service Library
//!
//! HTTP service that uploads local directories and zip archives into
//! per-project prefixes of an object storage bucket, lists them and serves
//! their content as text.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod service;
pub mod state;

pub use router::build_router;
