#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Persistence for the conflation pipeline.
//!
//! The preprocess and conflate phases can run as separate invocations, so
//! both indexes are written to JSON documents in between. Every write goes
//! to a sibling temporary file first and is renamed into place, so a failed
//! run never leaves a truncated document behind.

pub mod json;
pub mod paths;

use thiserror::Error;

/// Errors from reading or writing persisted documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document not found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// I/O error on a specific file.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being read or written.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error in {path}: {source}")]
    Json {
        /// File being read or written.
        path: String,
        /// Underlying error.
        source: serde_json::Error,
    },
}
