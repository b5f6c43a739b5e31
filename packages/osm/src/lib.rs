#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crowd-sourced (OpenStreetMap) side of street conflation.
//!
//! [`pbf::PbfRecords`] turns a PBF extract into a pull-based stream of
//! [`record::RawRecord`]s, one decoded block at a time. [`index::build`]
//! folds any such stream into a [`CrowdIndex`] in a single forward pass,
//! so memory stays proportional to the index rather than to the input.
//!
//! [`CrowdIndex`]: missing_streets_street_models::CrowdIndex

pub mod index;
pub mod pbf;
pub mod record;

use thiserror::Error;

/// Errors from reading an OSM PBF extract.
#[derive(Debug, Error)]
pub enum OsmError {
    /// PBF file not found.
    #[error("OSM PBF file not found: {0}")]
    FileNotFound(String),

    /// PBF decoding error.
    #[error("OSM PBF parse error in {path}: {message}")]
    Parse {
        /// Path to the PBF file.
        path: String,
        /// Error description.
        message: String,
    },

    /// Ways in the extract carry no embedded node locations.
    #[error(
        "OSM PBF {path} has no node locations on ways; \
         run `osmium add-locations-to-ways` on it first"
    )]
    MissingLocationsOnWays {
        /// Path to the PBF file.
        path: String,
    },
}
