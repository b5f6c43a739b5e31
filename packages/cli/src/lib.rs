#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pipeline behind the `missing_streets` binary.
//!
//! Builds the OpenStreetMap and authoritative street indexes, matches them
//! sector by sector, and writes the unmatched authoritative streets as a
//! `GeoJSON` feature collection.

pub mod config;
pub mod pipeline;

use missing_streets_authoritative::AuthoritativeError;
use missing_streets_conflate::ConflateError;
use missing_streets_osm::OsmError;
use missing_streets_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the command-line pipeline.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be loaded.
    #[error("Failed to load config {path}: {message}")]
    Config {
        /// Path of the config file.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// OSM extract error.
    #[error(transparent)]
    Osm(#[from] OsmError),

    /// Authoritative input error.
    #[error(transparent)]
    Authoritative(#[from] AuthoritativeError),

    /// Matching error.
    #[error(transparent)]
    Conflate(#[from] ConflateError),

    /// Persistence error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A blocking build task panicked.
    #[error("Index build task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
