#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street name normalization for conflation.
//!
//! Two independent steps:
//!
//! - [`expand`] turns an abbreviated, upper-cased authoritative name
//!   ("123 S MAIN ST") into a display name ("123 South Main Street").
//! - [`canonicalize`] turns any display name into a comparison key by
//!   lower-casing, folding a few spelling variants, and stripping
//!   punctuation and whitespace.
//!
//! Both are pure functions applied identically to both sources.

pub mod abbreviations;
pub mod canonicalize;
pub mod expand;

pub use canonicalize::canonicalize;
pub use expand::expand;
