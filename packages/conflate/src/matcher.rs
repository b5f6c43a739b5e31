//! The match decision and the sequential conflation loop.

use std::collections::BTreeMap;
use std::sync::Arc;

use missing_streets_spatial::{bbox, distance};
use missing_streets_street_models::progress::ProgressCallback;
use missing_streets_street_models::{
    AuthoritativeIndex, AuthoritativeStreet, CrowdIndex, CrowdStreet, MatchTolerance,
    MissingStreet, Sector,
};

use crate::ConflateError;

/// Whether `candidate` plausibly is the same road as `street`.
///
/// Names match when the candidate's primary or any alternate name code
/// equals the street's. The distance limit grows with the street's length
/// to absorb the gap between an OSM centroid and an authoritative endpoint.
#[must_use]
pub fn is_match(
    candidate: &CrowdStreet,
    street: &AuthoritativeStreet,
    tolerance: &MatchTolerance,
) -> bool {
    let names_match = candidate.name_code == street.name_code
        || candidate.other_name_codes.contains(&street.name_code);

    names_match
        && distance(candidate.lat, candidate.lng, street.lat, street.lng)
            < tolerance.limit(street.street_length)
}

/// Whether any crowd-sourced street in the sector matches `street`.
///
/// Tries the bucket for the street's own name code first, then falls back
/// to every bucket in the sector, which catches candidates that only
/// match through an alternate name.
#[must_use]
pub fn has_match(
    sector: Option<&BTreeMap<String, Vec<CrowdStreet>>>,
    street: &AuthoritativeStreet,
    tolerance: &MatchTolerance,
) -> bool {
    let Some(sector) = sector else {
        return false;
    };

    let exact = sector
        .get(&street.name_code)
        .is_some_and(|candidates| candidates.iter().any(|c| is_match(c, street, tolerance)));

    exact
        || sector
            .values()
            .flatten()
            .any(|candidate| is_match(candidate, street, tolerance))
}

/// Missing streets of one sector, in index order.
#[must_use]
pub fn conflate_sector(
    sector: Sector,
    streets: &[AuthoritativeStreet],
    crowd: &CrowdIndex,
    tolerance: &MatchTolerance,
) -> Vec<MissingStreet> {
    let candidates = crowd.sector(sector);

    streets
        .iter()
        .enumerate()
        .filter(|(_, street)| !has_match(candidates, street, tolerance))
        .map(|(i, street)| {
            log::debug!("Found no match for {}", street.name);
            missing_street(sector, i, street)
        })
        .collect()
}

/// Runs conflation over every sector, one after another.
///
/// # Errors
///
/// Returns [`ConflateError::GridMismatch`] if the indexes were built with
/// different sector grids.
pub fn conflate(
    authoritative: &AuthoritativeIndex,
    crowd: &CrowdIndex,
    tolerance: &MatchTolerance,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<MissingStreet>, ConflateError> {
    ensure_same_grid(authoritative, crowd)?;

    progress.set_total(authoritative.sectors.len() as u64);

    let mut missing = Vec::new();
    for (&sector, streets) in &authoritative.sectors {
        missing.extend(conflate_sector(sector, streets, crowd, tolerance));
        progress.inc(1);
    }

    progress.finish(format!("{} missing streets", missing.len()));
    Ok(missing)
}

pub(crate) fn ensure_same_grid(
    authoritative: &AuthoritativeIndex,
    crowd: &CrowdIndex,
) -> Result<(), ConflateError> {
    if authoritative.grid == crowd.grid {
        Ok(())
    } else {
        Err(ConflateError::GridMismatch {
            authoritative: authoritative.grid,
            crowd: crowd.grid,
        })
    }
}

fn missing_street(sector: Sector, i: usize, street: &AuthoritativeStreet) -> MissingStreet {
    MissingStreet {
        id: format!("{sector}_{i}"),
        road_id: street.road_id,
        name: street.name.clone(),
        bbox: bbox(&street.geometry)
            .unwrap_or([street.lng, street.lat, street.lng, street.lat]),
        geometry: street.geometry.clone(),
    }
}
