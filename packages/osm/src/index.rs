//! Crowd-sourced street index builder.

use std::sync::Arc;

use missing_streets_names::canonicalize;
use missing_streets_spatial::sector;
use missing_streets_street_models::progress::ProgressCallback;
use missing_streets_street_models::{CrowdIndex, CrowdStreet, Sector, SectorGrid};

use crate::record::{ALT_NAME, FeatureKind, NAME, NOT_NAME, OFFICIAL_NAME, OLD_NAME, RawRecord};

/// Records consumed between progress updates.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Priority order for the display name. `official_name` is deliberately
/// absent: it only ever widens matching.
const DISPLAY_NAME_TAGS: &[&str] = &[NAME, ALT_NAME, OLD_NAME, NOT_NAME];

/// Tags whose `;`-separated values become alternate name codes.
const OTHER_NAME_TAGS: &[&str] = &[OLD_NAME, ALT_NAME, OFFICIAL_NAME, NOT_NAME];

/// Why a record was left out of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Point features are never streets.
    Point,
    /// No usable display name.
    Unnamed,
}

/// Counters from one index build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrowdBuildStats {
    /// Records consumed from the stream.
    pub records: u64,
    /// Streets added to the index.
    pub indexed: u64,
    /// Records skipped because they were points.
    pub skipped_points: u64,
    /// Records skipped because they had no usable name.
    pub skipped_unnamed: u64,
}

impl CrowdBuildStats {
    const fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Point => self.skipped_points += 1,
            SkipReason::Unnamed => self.skipped_unnamed += 1,
        }
    }
}

/// Folds a record stream into a [`CrowdIndex`].
///
/// Consumes the stream in a single forward pass. The first error yielded
/// by the stream aborts the build and is returned unchanged.
///
/// # Errors
///
/// Returns the first error produced by `records`.
pub fn build<I, E>(
    records: I,
    grid: &SectorGrid,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(CrowdIndex, CrowdBuildStats), E>
where
    I: IntoIterator<Item = Result<RawRecord, E>>,
{
    let mut index = CrowdIndex::new(*grid);
    let mut stats = CrowdBuildStats::default();

    for record in records {
        let record = record?;
        stats.records += 1;

        match street_from_record(&record, grid) {
            Ok((sector, street)) => {
                index.insert(sector, street);
                stats.indexed += 1;
            }
            Err(reason) => stats.record_skip(reason),
        }

        if stats.records % PROGRESS_INTERVAL == 0 {
            progress.inc(PROGRESS_INTERVAL);
        }
    }

    progress.inc(stats.records % PROGRESS_INTERVAL);
    progress.finish(format!(
        "Indexed {} OSM streets in {} sectors",
        stats.indexed,
        index.sectors.len()
    ));
    log::info!(
        "OSM index: {} records, {} indexed, {} points skipped, {} unnamed skipped",
        stats.records,
        stats.indexed,
        stats.skipped_points,
        stats.skipped_unnamed
    );

    Ok((index, stats))
}

/// Converts one record into the street stored under its sector.
///
/// # Errors
///
/// Returns the [`SkipReason`] when the record is not indexable.
pub fn street_from_record(
    record: &RawRecord,
    grid: &SectorGrid,
) -> Result<(Sector, CrowdStreet), SkipReason> {
    if record.kind == FeatureKind::Point {
        return Err(SkipReason::Point);
    }

    // a road can have no name but still carry an old_name
    let name = DISPLAY_NAME_TAGS
        .iter()
        .find_map(|tag| record.tag(tag))
        .ok_or(SkipReason::Unnamed)?;

    let other_name_codes = OTHER_NAME_TAGS
        .iter()
        .filter_map(|tag| record.tag(tag))
        .flat_map(|value| value.split(';'))
        .map(canonicalize)
        .filter(|code| !code.is_empty())
        .collect();

    let street = CrowdStreet {
        way_id: record.id,
        name: name.to_string(),
        name_code: canonicalize(name),
        lat: record.lat,
        lng: record.lng,
        other_name_codes,
    };

    Ok((sector(grid, record.lat, record.lng), street))
}
