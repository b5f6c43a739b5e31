//! Preprocess and conflate phases.
//!
//! Index builds run on tokio's blocking pool, the two sources in parallel.
//! Matching starts only once both indexes are complete, and the output is
//! written only after matching finishes.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use missing_streets_cli_utils::{IndicatifProgress, MultiProgress, Phase};
use missing_streets_conflate::output::MissingStreetCollection;
use missing_streets_conflate::parallel::conflate_parallel;
use missing_streets_osm::pbf::PbfRecords;
use missing_streets_store::json::{
    Layout, load_authoritative_index, load_crowd_index, save_authoritative_index,
    save_crowd_index, write_json,
};
use missing_streets_store::paths::Paths;
use missing_streets_street_models::progress::ProgressCallback;
use missing_streets_street_models::{
    AuthoritativeFields, AuthoritativeIndex, ConflationConfig, CrowdIndex, MatchTolerance,
    SectorGrid,
};

use crate::CliError;

/// Index building, then matching.
const RUN_STEPS: u64 = 2;

/// Streams the PBF extract into a [`CrowdIndex`].
///
/// # Errors
///
/// Returns an error if the extract cannot be opened or decoded.
pub async fn build_crowd_index(
    path: PathBuf,
    grid: SectorGrid,
    progress: Arc<dyn ProgressCallback>,
) -> Result<CrowdIndex, CliError> {
    tokio::task::spawn_blocking(move || -> Result<_, CliError> {
        let mut records = PbfRecords::open(&path)?;
        let (index, _) = missing_streets_osm::index::build(records.by_ref(), &grid, &progress)?;

        let decode = records.stats();
        log::info!(
            "Decoded {} blocks from {}: {} highway ways located, {} without locations",
            decode.blocks,
            path.display(),
            decode.located_ways,
            decode.ways_without_locations
        );

        Ok(index)
    })
    .await?
}

/// Reads the authoritative `GeoJSON` into an [`AuthoritativeIndex`].
///
/// # Errors
///
/// Returns an error if the document cannot be read or is not a
/// `FeatureCollection`.
pub async fn build_authoritative_index(
    path: PathBuf,
    fields: AuthoritativeFields,
    grid: SectorGrid,
    progress: Arc<dyn ProgressCallback>,
) -> Result<AuthoritativeIndex, CliError> {
    tokio::task::spawn_blocking(move || -> Result<_, CliError> {
        let collection = missing_streets_authoritative::reader::read_feature_collection(&path)?;
        let (index, _) = missing_streets_authoritative::index::build(
            &collection.features,
            &fields,
            &grid,
            &progress,
        );
        Ok(index)
    })
    .await?
}

/// Builds both indexes concurrently.
///
/// # Errors
///
/// Returns the first error from either build.
pub async fn build_indexes(
    config: &ConflationConfig,
    paths: &Paths,
    multi: &MultiProgress,
) -> Result<(AuthoritativeIndex, CrowdIndex), CliError> {
    let crowd = build_crowd_index(
        paths.osm_pbf.clone(),
        config.sectors,
        IndicatifProgress::phase_bar(multi, Phase::OsmRecords),
    );
    let authoritative = build_authoritative_index(
        paths.authoritative_geojson.clone(),
        config.authoritative.clone(),
        config.sectors,
        IndicatifProgress::phase_bar(multi, Phase::AuthoritativeFeatures),
    );

    let (crowd, authoritative) = tokio::try_join!(crowd, authoritative)?;
    Ok((authoritative, crowd))
}

/// Matches the indexes and writes the missing streets to `output`.
///
/// Returns the number of missing streets.
///
/// # Errors
///
/// Returns an error if the indexes use different grids, a worker fails,
/// or the output cannot be written.
pub async fn match_and_write(
    authoritative: AuthoritativeIndex,
    crowd: CrowdIndex,
    tolerance: MatchTolerance,
    output: &Path,
    multi: &MultiProgress,
) -> Result<usize, CliError> {
    let missing = conflate_parallel(
        Arc::new(authoritative),
        Arc::new(crowd),
        tolerance,
        IndicatifProgress::phase_bar(multi, Phase::Matching),
    )
    .await?;

    let collection = MissingStreetCollection::new(missing);
    log::info!(
        "Writing {} missing streets to {}",
        collection.features.len(),
        output.display()
    );
    write_json(output, &collection.to_geojson(), Layout::Pretty)?;

    Ok(collection.features.len())
}

/// Builds both indexes and persists them for a later [`conflate`].
///
/// # Errors
///
/// Returns an error if either build fails or an index cannot be written.
pub async fn preprocess(config: &ConflationConfig, multi: &MultiProgress) -> Result<(), CliError> {
    let paths = Paths::from_config(&config.paths);
    let start = Instant::now();

    let (authoritative, crowd) = build_indexes(config, &paths, multi).await?;
    save_crowd_index(&paths.osm_index, &crowd)?;
    save_authoritative_index(&paths.authoritative_index, &authoritative)?;

    log::info!(
        "Preprocessing complete in {:.1}s",
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Loads persisted indexes, matches them, and writes the output.
///
/// Returns the number of missing streets.
///
/// # Errors
///
/// Returns an error if either index cannot be loaded, or matching or
/// writing fails.
pub async fn conflate(config: &ConflationConfig, multi: &MultiProgress) -> Result<usize, CliError> {
    let paths = Paths::from_config(&config.paths);
    let start = Instant::now();

    let crowd = load_crowd_index(&paths.osm_index)?;
    let authoritative = load_authoritative_index(&paths.authoritative_index)?;

    let missing =
        match_and_write(authoritative, crowd, config.tolerance, &paths.output, multi).await?;

    log::info!(
        "Conflation complete in {:.1}s",
        start.elapsed().as_secs_f64()
    );
    Ok(missing)
}

/// Runs both phases in one process.
///
/// Intermediate indexes stay in memory unless `keep_indexes` is set.
/// Returns the number of missing streets.
///
/// # Errors
///
/// Returns the first error from any phase.
pub async fn run(
    config: &ConflationConfig,
    multi: &MultiProgress,
    keep_indexes: bool,
) -> Result<usize, CliError> {
    let paths = Paths::from_config(&config.paths);
    let start = Instant::now();
    let steps = IndicatifProgress::phase_bar(multi, Phase::Run);
    steps.set_total(RUN_STEPS);

    steps.set_message("Building indexes".to_string());
    let (authoritative, crowd) = build_indexes(config, &paths, multi).await?;
    if keep_indexes {
        save_crowd_index(&paths.osm_index, &crowd)?;
        save_authoritative_index(&paths.authoritative_index, &authoritative)?;
    }
    steps.inc(1);

    steps.set_message("Matching".to_string());
    let missing =
        match_and_write(authoritative, crowd, config.tolerance, &paths.output, multi).await?;
    steps.inc(1);

    steps.finish(format!(
        "{missing} missing streets in {:.1}s",
        start.elapsed().as_secs_f64()
    ));
    Ok(missing)
}
