//! Per-sector fan-out of the matcher.
//!
//! Both indexes are fully built before this runs and are only read, so
//! they are shared through `Arc` without locking. Sectors are split into
//! one contiguous chunk per worker and dispatched to tokio's blocking pool.

use std::num::NonZeroUsize;
use std::sync::Arc;

use missing_streets_street_models::progress::ProgressCallback;
use missing_streets_street_models::{
    AuthoritativeIndex, CrowdIndex, MatchTolerance, MissingStreet, Sector,
};
use tokio::task::JoinSet;

use crate::ConflateError;
use crate::matcher::{conflate_sector, ensure_same_grid};

/// Runs conflation with sectors spread across blocking worker tasks.
///
/// Output order matches [`crate::matcher::conflate`]: ascending sector,
/// then index order within each sector.
///
/// # Errors
///
/// Returns [`ConflateError::GridMismatch`] if the indexes were built with
/// different grids, or [`ConflateError::Join`] if a worker panics.
pub async fn conflate_parallel(
    authoritative: Arc<AuthoritativeIndex>,
    crowd: Arc<CrowdIndex>,
    tolerance: MatchTolerance,
    progress: Arc<dyn ProgressCallback>,
) -> Result<Vec<MissingStreet>, ConflateError> {
    ensure_same_grid(&authoritative, &crowd)?;

    let sectors: Vec<Sector> = authoritative.sectors.keys().copied().collect();
    progress.set_total(sectors.len() as u64);

    let workers = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let chunk_size = sectors.len().div_ceil(workers).max(1);

    log::info!(
        "Conflating {} sectors across {} workers",
        sectors.len(),
        sectors.len().div_ceil(chunk_size)
    );

    let mut tasks = JoinSet::new();
    for chunk in sectors.chunks(chunk_size) {
        let chunk = chunk.to_vec();
        let authoritative = Arc::clone(&authoritative);
        let crowd = Arc::clone(&crowd);
        let progress = Arc::clone(&progress);

        tasks.spawn_blocking(move || {
            chunk
                .into_iter()
                .map(|sector| {
                    let streets = authoritative
                        .sectors
                        .get(&sector)
                        .map_or(&[][..], Vec::as_slice);
                    let missing = conflate_sector(sector, streets, &crowd, &tolerance);
                    progress.inc(1);
                    (sector, missing)
                })
                .collect::<Vec<_>>()
        });
    }

    let mut per_sector = Vec::with_capacity(sectors.len());
    while let Some(result) = tasks.join_next().await {
        per_sector.extend(result?);
    }
    per_sector.sort_by_key(|(sector, _)| *sector);

    let missing: Vec<MissingStreet> = per_sector
        .into_iter()
        .flat_map(|(_, missing)| missing)
        .collect();

    progress.finish(format!("{} missing streets", missing.len()));
    Ok(missing)
}
