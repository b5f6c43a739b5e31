#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for a conflation run.
//!
//! All paths are resolved against the configured data directory unless
//! they are already absolute.

use std::path::{Path, PathBuf};

use missing_streets_street_models::PathsConfig;

/// Resolved locations of every pipeline input and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// OSM PBF extract.
    pub osm_pbf: PathBuf,
    /// Persisted OSM index.
    pub osm_index: PathBuf,
    /// Authoritative `GeoJSON`.
    pub authoritative_geojson: PathBuf,
    /// Persisted authoritative index.
    pub authoritative_index: PathBuf,
    /// Missing-street output.
    pub output: PathBuf,
}

impl Paths {
    /// Resolves a [`PathsConfig`].
    #[must_use]
    pub fn from_config(config: &PathsConfig) -> Self {
        let data_dir = PathBuf::from(&config.data_dir);
        Self {
            osm_pbf: data_dir.join(&config.osm_pbf),
            osm_index: data_dir.join(&config.osm_index),
            authoritative_geojson: data_dir.join(&config.authoritative_geojson),
            authoritative_index: data_dir.join(&config.authoritative_index),
            output: data_dir.join(&config.output),
        }
    }
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
