#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Conflation of the authoritative road network against OpenStreetMap.
//!
//! For each authoritative street the matcher looks for *any* crowd-sourced
//! street in the same sector that shares its name code (directly or via an
//! alternate name) and lies within a length-scaled distance. Streets with
//! no such candidate are reported as missing. There is no ranking and no
//! record of which candidate matched.
//!
//! Sectors never interact, so [`parallel::conflate_parallel`] fans sectors
//! out over the blocking thread pool and produces the same output as the
//! sequential [`matcher::conflate`].

pub mod matcher;
pub mod output;
pub mod parallel;

use missing_streets_street_models::SectorGrid;
use thiserror::Error;

/// Errors from a conflation run.
#[derive(Debug, Error)]
pub enum ConflateError {
    /// The two indexes were partitioned differently, so their sector ids
    /// are not comparable.
    #[error(
        "Sector grids differ between indexes (authoritative {authoritative:?}, OSM {crowd:?}); rebuild both"
    )]
    GridMismatch {
        /// Grid of the authoritative index.
        authoritative: SectorGrid,
        /// Grid of the crowd-sourced index.
        crowd: SectorGrid,
    },

    /// A matching worker panicked or was cancelled.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}
