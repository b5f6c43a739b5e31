#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Authoritative side of street conflation.
//!
//! Reads the survey road network as a `GeoJSON` `FeatureCollection`,
//! expands and canonicalizes each road name, and groups the roads by the
//! sector of their endpoints. Roads whose endpoints fall in different
//! sectors are dropped rather than assigned to either.

pub mod index;
pub mod reader;

use thiserror::Error;

/// Errors from reading the authoritative network.
#[derive(Debug, Error)]
pub enum AuthoritativeError {
    /// Input file not found.
    #[error("Authoritative GeoJSON not found: {0}")]
    FileNotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but is not a feature collection.
    #[error("Expected a GeoJSON FeatureCollection in {path}, found {found}")]
    NotFeatureCollection {
        /// Path of the offending document.
        path: String,
        /// What the document was instead.
        found: &'static str,
    },
}
