#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spatial primitives for street conflation.
//!
//! - [`distance`]: haversine great-circle distance in meters.
//! - [`sector`]: maps a coordinate to a coarse integer bucket so matching
//!   only ever compares streets that share a bucket.
//! - [`bbox`]: bounding box of a `GeoJSON` line geometry for output.
//!
//! All inputs are WGS84 decimal degrees.

pub mod bbox;
pub mod distance;
pub mod sector;

pub use bbox::bbox;
pub use distance::distance;
pub use sector::{sector, sector_cell};
