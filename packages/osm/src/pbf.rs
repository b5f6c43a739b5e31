//! OpenStreetMap PBF record stream.
//!
//! Reads the extract one blob at a time through `osmpbf`'s [`BlobReader`]
//! and yields every element carrying a `highway` tag as a [`RawRecord`].
//! At most one decoded block is buffered, regardless of file size.
//!
//! A way's centroid is the mean of the node locations embedded in the way
//! itself, so the extract must have been prepared with locations on ways
//! (for example `osmium add-locations-to-ways`). A file whose header does
//! not advertise `LocationsOnWays` is rejected up front. Individual ways
//! without embedded locations are skipped and counted in [`DecodeStats`];
//! if no highway way had locations at all the stream ends with
//! [`OsmError::MissingLocationsOnWays`].

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use geo::Centroid;
use osmpbf::{BlobDecode, BlobReader, Element, PrimitiveBlock};

use crate::OsmError;
use crate::record::{FeatureKind, NAME_TAGS, RawRecord};

/// Tag that marks an element as part of the road network.
const HIGHWAY: &str = "highway";

/// Header feature written by tools that embed node locations in ways.
const LOCATIONS_ON_WAYS: &str = "LocationsOnWays";

/// Counters collected while decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Data blocks decoded.
    pub blocks: u64,
    /// Highway ways yielded with a centroid.
    pub located_ways: u64,
    /// Highway ways dropped because they carried no node locations.
    pub ways_without_locations: u64,
}

/// Pull-based iterator over the highway elements of a PBF extract.
pub struct PbfRecords<R: Read + Send> {
    path: String,
    blobs: BlobReader<R>,
    pending: std::vec::IntoIter<RawRecord>,
    stats: DecodeStats,
    finished: bool,
}

impl PbfRecords<BufReader<File>> {
    /// Opens a PBF file for streaming.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn open(path: &Path) -> Result<Self, OsmError> {
        if !path.exists() {
            return Err(OsmError::FileNotFound(path.display().to_string()));
        }

        log::info!("Streaming OSM PBF: {}", path.display());

        let blobs = BlobReader::from_path(path).map_err(|e| OsmError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(Self::new(path.display().to_string(), blobs))
    }
}

impl<R: Read + Send> PbfRecords<R> {
    /// Wraps an existing blob reader. `label` is used in error messages.
    pub fn new(label: String, blobs: BlobReader<R>) -> Self {
        Self {
            path: label,
            blobs,
            pending: Vec::new().into_iter(),
            stats: DecodeStats::default(),
            finished: false,
        }
    }

    /// Counters accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> DecodeStats {
        self.stats
    }

    fn parse_error(&self, e: &osmpbf::Error) -> OsmError {
        OsmError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }

    fn missing_locations(&mut self) -> OsmError {
        self.finished = true;
        OsmError::MissingLocationsOnWays {
            path: self.path.clone(),
        }
    }

    fn decode_block(&mut self, block: &PrimitiveBlock) -> Vec<RawRecord> {
        let mut records = Vec::new();

        for element in block.elements() {
            match element {
                Element::Node(node) => {
                    if let Some(tags) = highway_tags(node.tags()) {
                        records.push(point(node.id(), node.lat(), node.lon(), tags));
                    }
                }
                Element::DenseNode(node) => {
                    if let Some(tags) = highway_tags(node.tags()) {
                        records.push(point(node.id(), node.lat(), node.lon(), tags));
                    }
                }
                Element::Way(way) => {
                    let Some(tags) = highway_tags(way.tags()) else {
                        continue;
                    };
                    let Some((lat, lng)) =
                        centroid(way.node_locations().map(|loc| (loc.lon(), loc.lat())))
                    else {
                        self.stats.ways_without_locations += 1;
                        log::debug!("Way {} has no node locations, skipping", way.id());
                        continue;
                    };
                    self.stats.located_ways += 1;
                    records.push(RawRecord {
                        kind: FeatureKind::Line,
                        id: way.id(),
                        lat,
                        lng,
                        tags,
                    });
                }
                Element::Relation(_) => {}
            }
        }

        records
    }
}

impl<R: Read + Send> Iterator for PbfRecords<R> {
    type Item = Result<RawRecord, OsmError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.next() {
                return Some(Ok(record));
            }
            if self.finished {
                return None;
            }

            let Some(blob) = self.blobs.next() else {
                self.finished = true;
                if self.stats.located_ways == 0 && self.stats.ways_without_locations > 0 {
                    return Some(Err(self.missing_locations()));
                }
                return None;
            };
            let blob = match blob {
                Ok(blob) => blob,
                Err(e) => return Some(Err(self.parse_error(&e))),
            };

            match blob.decode() {
                Ok(BlobDecode::OsmHeader(header)) => {
                    let has_locations = header
                        .required_features()
                        .iter()
                        .chain(header.optional_features())
                        .any(|feature| feature == LOCATIONS_ON_WAYS);
                    if !has_locations {
                        return Some(Err(self.missing_locations()));
                    }
                }
                Ok(BlobDecode::OsmData(block)) => {
                    self.stats.blocks += 1;
                    self.pending = self.decode_block(&block).into_iter();
                }
                Ok(BlobDecode::Unknown(kind)) => {
                    log::debug!("Skipping unknown blob type {kind}");
                }
                Err(e) => return Some(Err(self.parse_error(&e))),
            }
        }
    }
}

fn point(id: i64, lat: f64, lng: f64, tags: BTreeMap<String, String>) -> RawRecord {
    RawRecord {
        kind: FeatureKind::Point,
        id,
        lat,
        lng,
        tags,
    }
}

/// Returns the name tags of a highway element, or `None` if the element
/// is not tagged `highway`. Other tags are dropped.
fn highway_tags<'a>(
    tags: impl Iterator<Item = (&'a str, &'a str)>,
) -> Option<BTreeMap<String, String>> {
    let mut is_highway = false;
    let mut kept = BTreeMap::new();

    for (key, value) in tags {
        if key == HIGHWAY {
            is_highway = true;
        } else if NAME_TAGS.contains(&key) {
            kept.insert(key.to_string(), value.to_string());
        }
    }

    is_highway.then_some(kept)
}

/// Mean `(lat, lng)` of a way's `(lon, lat)` node locations.
fn centroid(locations: impl Iterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    let nodes: geo::MultiPoint<f64> = locations
        .filter(|(lon, lat)| lon.is_finite() && lat.is_finite())
        .map(geo::Point::from)
        .collect();
    let center = nodes.centroid()?;
    Some((center.y(), center.x()))
}
