#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for street conflation.
//!
//! This crate contains only data types, configuration structs, and simple
//! accessors. It has no heavyweight dependencies (no PBF decoding, no I/O).
//! Field names serialize in camelCase so persisted index documents keep
//! the same shape across the preprocess and conflate phases.

pub mod progress;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Integer id of a coarse spatial bucket. See [`SectorGrid`].
pub type Sector = i64;

/// How a sector's `(column, row)` pair is folded into a single [`Sector`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorPairing {
    /// Column in the high 32 bits, row in the low 32 bits. Injective for
    /// any `(column, row)` that fits in `i32`.
    #[default]
    Packed,
    /// `column * row`. Not collision-free (`(2, 3)` and `(3, 2)` share a
    /// bucket, as does every pair containing a zero). Kept for parity with
    /// index documents produced by older tooling.
    Multiplicative,
}

/// Parameters of the sector partitioning.
///
/// A higher `scale` produces more, smaller buckets: fewer comparisons per
/// bucket, but more streets split across adjacent buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorGrid {
    /// Buckets per degree.
    pub scale: f64,
    /// Reference longitude that column 0 is centered on.
    pub lon_anchor: f64,
    /// Reference latitude that row 0 is centered on. Rows grow southward.
    pub lat_anchor: f64,
    /// How column and row are combined.
    pub pairing: SectorPairing,
}

impl Default for SectorGrid {
    fn default() -> Self {
        Self {
            scale: 0.7,
            lon_anchor: 166.0,
            lat_anchor: -34.0,
            pairing: SectorPairing::default(),
        }
    }
}

/// Distance tolerance for the conflation match test.
///
/// A candidate is close enough when its distance to the authoritative
/// street is below `floor_meters + length_multiplier * street_length`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchTolerance {
    /// Flat tolerance applied to every street, in meters.
    pub floor_meters: f64,
    /// Multiplier on the authoritative street's endpoint-to-endpoint length.
    pub length_multiplier: f64,
}

impl MatchTolerance {
    /// Maximum (exclusive) distance in meters for a street of the given
    /// length.
    #[must_use]
    pub fn limit(&self, street_length: f64) -> f64 {
        self.length_multiplier.mul_add(street_length, self.floor_meters)
    }
}

impl Default for MatchTolerance {
    fn default() -> Self {
        Self {
            floor_meters: 10_000.0,
            length_multiplier: 2.0,
        }
    }
}

/// Which properties of the authoritative `GeoJSON` carry the street name
/// and identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthoritativeFields {
    /// Name properties tried in order; the first non-empty one wins.
    pub name_fields: Vec<String>,
    /// Property holding the integer road identifier.
    pub id_field: String,
    /// Accept `MultiLineString` geometries, using the first coordinate of
    /// the first part and the last coordinate of the last part as the
    /// endpoints.
    pub accept_multi_line_strings: bool,
}

impl Default for AuthoritativeFields {
    fn default() -> Self {
        Self {
            name_fields: vec!["FULLNAME".to_string(), "NAME".to_string()],
            id_field: "OBJECTID".to_string(),
            accept_multi_line_strings: false,
        }
    }
}

/// File names used by the pipeline, relative to `data_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory every other path is resolved against.
    pub data_dir: String,
    /// OpenStreetMap PBF extract (with locations on ways).
    pub osm_pbf: String,
    /// Persisted crowd-sourced index.
    pub osm_index: String,
    /// Authoritative `GeoJSON` feature collection.
    pub authoritative_geojson: String,
    /// Persisted authoritative index.
    pub authoritative_index: String,
    /// Missing-street feature collection.
    pub output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            osm_pbf: "osm.pbf".to_string(),
            osm_index: "osm.json".to_string(),
            authoritative_geojson: "ugrc.geojson".to_string(),
            authoritative_index: "ugrc.json".to_string(),
            output: "conflationResult.geo.json".to_string(),
        }
    }
}

/// Top-level configuration for a conflation run, usually loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflationConfig {
    /// Sector partitioning shared by both index builders and the matcher.
    pub sectors: SectorGrid,
    /// Match distance tolerance.
    pub tolerance: MatchTolerance,
    /// Authoritative source field mapping.
    pub authoritative: AuthoritativeFields,
    /// Input and output file locations.
    pub paths: PathsConfig,
}

/// A street from the crowd-sourced (OpenStreetMap) network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrowdStreet {
    /// OSM way id.
    pub way_id: i64,
    /// Display name chosen from the name tags.
    pub name: String,
    /// Canonical comparison key of `name`.
    pub name_code: String,
    /// Centroid latitude.
    pub lat: f64,
    /// Centroid longitude.
    pub lng: f64,
    /// Canonical keys of alternate, historical, and official names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_name_codes: Vec<String>,
}

/// A street from the authoritative survey network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthoritativeStreet {
    /// Stable road identifier from the source.
    pub road_id: i64,
    /// Expanded display name.
    pub name: String,
    /// Canonical comparison key of `name`.
    pub name_code: String,
    /// Latitude of the first endpoint.
    pub lat: f64,
    /// Longitude of the first endpoint.
    pub lng: f64,
    /// Great-circle distance in meters between the two endpoints.
    pub street_length: f64,
    /// Original line geometry, carried through to the output.
    pub geometry: geojson::Geometry,
}

/// Crowd-sourced streets grouped by sector, then by name code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrowdIndex {
    /// Grid the sectors were computed with.
    pub grid: SectorGrid,
    /// sector -> name code -> streets
    pub sectors: BTreeMap<Sector, BTreeMap<String, Vec<CrowdStreet>>>,
}

impl CrowdIndex {
    /// Creates an empty index for the given grid.
    #[must_use]
    pub const fn new(grid: SectorGrid) -> Self {
        Self {
            grid,
            sectors: BTreeMap::new(),
        }
    }

    /// Appends a street to `sectors[sector][street.name_code]`.
    pub fn insert(&mut self, sector: Sector, street: CrowdStreet) {
        self.sectors
            .entry(sector)
            .or_default()
            .entry(street.name_code.clone())
            .or_default()
            .push(street);
    }

    /// Name-code buckets of one sector, if any street landed there.
    #[must_use]
    pub fn sector(&self, sector: Sector) -> Option<&BTreeMap<String, Vec<CrowdStreet>>> {
        self.sectors.get(&sector)
    }

    /// Total number of indexed streets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sectors
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Returns `true` if no street has been indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

/// Authoritative streets grouped by sector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthoritativeIndex {
    /// Grid the sectors were computed with.
    pub grid: SectorGrid,
    /// sector -> streets, in source order
    pub sectors: BTreeMap<Sector, Vec<AuthoritativeStreet>>,
}

impl AuthoritativeIndex {
    /// Creates an empty index for the given grid.
    #[must_use]
    pub const fn new(grid: SectorGrid) -> Self {
        Self {
            grid,
            sectors: BTreeMap::new(),
        }
    }

    /// Appends a street to `sectors[sector]`.
    pub fn push(&mut self, sector: Sector, street: AuthoritativeStreet) {
        self.sectors.entry(sector).or_default().push(street);
    }

    /// Total number of indexed streets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sectors.values().map(Vec::len).sum()
    }

    /// Returns `true` if no street has been indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

/// An authoritative street with no counterpart in the crowd-sourced index.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingStreet {
    /// `"{sector}_{index within sector}"`.
    pub id: String,
    /// Source road identifier.
    pub road_id: i64,
    /// Expanded display name.
    pub name: String,
    /// `[min_lng, min_lat, max_lng, max_lat]`.
    pub bbox: [f64; 4],
    /// Original line geometry.
    pub geometry: geojson::Geometry,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn street(way_id: i64, name_code: &str) -> CrowdStreet {
        CrowdStreet {
            way_id,
            name: name_code.to_string(),
            name_code: name_code.to_string(),
            lat: -41.0,
            lng: 174.0,
            other_name_codes: Vec::new(),
        }
    }

    #[test]
    fn crowd_index_groups_by_sector_and_name_code() {
        let mut index = CrowdIndex::new(SectorGrid::default());
        index.insert(7, street(1, "mainstreet"));
        index.insert(7, street(2, "mainstreet"));
        index.insert(7, street(3, "highstreet"));
        index.insert(8, street(4, "mainstreet"));

        assert_eq!(index.len(), 4);
        let sector = index.sector(7).unwrap();
        assert_eq!(sector["mainstreet"].len(), 2);
        assert_eq!(sector["highstreet"].len(), 1);
        assert!(index.sector(9).is_none());
    }

    #[test]
    fn crowd_street_omits_empty_other_name_codes() {
        let json = serde_json::to_value(street(1, "mainstreet")).unwrap();
        assert_eq!(json["wayId"], 1);
        assert_eq!(json["nameCode"], "mainstreet");
        assert!(json.get("otherNameCodes").is_none());
    }

    #[test]
    fn crowd_index_round_trips_integer_sector_keys() {
        let mut index = CrowdIndex::new(SectorGrid::default());
        index.insert(-42, street(1, "mainstreet"));
        let json = serde_json::to_string(&index).unwrap();
        let back: CrowdIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(back, index);
    }

    #[test]
    fn tolerance_scales_with_length() {
        let tolerance = MatchTolerance::default();
        assert!((tolerance.limit(0.0) - 10_000.0).abs() < f64::EPSILON);
        assert!((tolerance.limit(500.0) - 11_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ConflationConfig = toml::from_str(
            r#"
            [sectors]
            pairing = "multiplicative"

            [tolerance]
            floor_meters = 5000.0
            "#,
        )
        .unwrap();

        assert_eq!(config.sectors.pairing, SectorPairing::Multiplicative);
        assert!((config.sectors.scale - 0.7).abs() < f64::EPSILON);
        assert!((config.tolerance.floor_meters - 5000.0).abs() < f64::EPSILON);
        assert!((config.tolerance.length_multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.authoritative, AuthoritativeFields::default());
        assert_eq!(config.paths, PathsConfig::default());
    }
}
