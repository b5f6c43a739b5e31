//! Authoritative street index builder.

use std::sync::Arc;

use geojson::{Feature, Geometry, Value};
use missing_streets_names::{canonicalize, expand};
use missing_streets_spatial::{distance, sector};
use missing_streets_street_models::progress::ProgressCallback;
use missing_streets_street_models::{
    AuthoritativeFields, AuthoritativeIndex, AuthoritativeStreet, Sector, SectorGrid,
};

/// Why a feature was left out of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Feature has a null geometry.
    NoGeometry,
    /// No name property, or the name expanded to nothing.
    Unnamed,
    /// Identifier property missing or not an integer.
    MissingId,
    /// Geometry is not a (single) line.
    UnsupportedGeometry,
    /// Line has fewer than two usable positions.
    DegenerateLine,
    /// Endpoints fall in different sectors.
    CrossSector,
}

/// Counters from one index build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthoritativeBuildStats {
    /// Features read.
    pub features: u64,
    /// Streets added to the index.
    pub indexed: u64,
    /// Features with no geometry.
    pub skipped_no_geometry: u64,
    /// Features with no usable name.
    pub skipped_unnamed: u64,
    /// Features without a usable identifier.
    pub skipped_missing_id: u64,
    /// Features with a non-line geometry.
    pub skipped_unsupported_geometry: u64,
    /// Lines with fewer than two positions.
    pub skipped_degenerate: u64,
    /// Lines spanning two sectors.
    pub skipped_cross_sector: u64,
}

impl AuthoritativeBuildStats {
    const fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::NoGeometry => self.skipped_no_geometry += 1,
            SkipReason::Unnamed => self.skipped_unnamed += 1,
            SkipReason::MissingId => self.skipped_missing_id += 1,
            SkipReason::UnsupportedGeometry => self.skipped_unsupported_geometry += 1,
            SkipReason::DegenerateLine => self.skipped_degenerate += 1,
            SkipReason::CrossSector => self.skipped_cross_sector += 1,
        }
    }
}

/// Builds the authoritative index from a list of features.
#[must_use]
pub fn build(
    features: &[Feature],
    fields: &AuthoritativeFields,
    grid: &SectorGrid,
    progress: &Arc<dyn ProgressCallback>,
) -> (AuthoritativeIndex, AuthoritativeBuildStats) {
    let mut index = AuthoritativeIndex::new(*grid);
    let mut stats = AuthoritativeBuildStats::default();

    progress.set_total(features.len() as u64);

    for feature in features {
        stats.features += 1;

        match street_from_feature(feature, fields, grid) {
            Ok((sector, street)) => {
                index.push(sector, street);
                stats.indexed += 1;
            }
            Err(reason) => {
                log::debug!("Skipping authoritative feature {:?}: {reason:?}", feature.id);
                stats.record_skip(reason);
            }
        }

        progress.inc(1);
    }

    progress.finish(format!(
        "Indexed {} authoritative streets in {} sectors",
        stats.indexed,
        index.sectors.len()
    ));
    log::info!(
        "Authoritative index: {} features, {} indexed, {} cross-sector, {} unnamed, \
         {} unsupported geometry, {} without geometry, {} without id, {} degenerate",
        stats.features,
        stats.indexed,
        stats.skipped_cross_sector,
        stats.skipped_unnamed,
        stats.skipped_unsupported_geometry,
        stats.skipped_no_geometry,
        stats.skipped_missing_id,
        stats.skipped_degenerate
    );

    (index, stats)
}

/// Converts one feature into the street stored under its sector.
///
/// # Errors
///
/// Returns the [`SkipReason`] when the feature is not indexable.
pub fn street_from_feature(
    feature: &Feature,
    fields: &AuthoritativeFields,
    grid: &SectorGrid,
) -> Result<(Sector, AuthoritativeStreet), SkipReason> {
    let name = raw_name(feature, fields)
        .map(expand)
        .filter(|name| !name.is_empty())
        .ok_or(SkipReason::Unnamed)?;

    let geometry = feature.geometry.as_ref().ok_or(SkipReason::NoGeometry)?;
    let ((first_lng, first_lat), (last_lng, last_lat)) = endpoints(geometry, fields)?;

    let first_sector = sector(grid, first_lat, first_lng);
    if first_sector != sector(grid, last_lat, last_lng) {
        return Err(SkipReason::CrossSector);
    }

    let road_id = feature
        .property(&fields.id_field)
        .and_then(parse_id)
        .ok_or(SkipReason::MissingId)?;

    let street = AuthoritativeStreet {
        road_id,
        name_code: canonicalize(&name),
        name,
        lat: first_lat,
        lng: first_lng,
        street_length: distance(first_lat, first_lng, last_lat, last_lng),
        geometry: geometry.clone(),
    };

    Ok((first_sector, street))
}

/// First non-empty string among the configured name properties.
fn raw_name<'a>(feature: &'a Feature, fields: &AuthoritativeFields) -> Option<&'a str> {
    fields.name_fields.iter().find_map(|field| {
        feature
            .property(field)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    })
}

type LngLat = (f64, f64);

/// The two logical endpoints of a line geometry.
fn endpoints(
    geometry: &Geometry,
    fields: &AuthoritativeFields,
) -> Result<(LngLat, LngLat), SkipReason> {
    match &geometry.value {
        Value::LineString(positions) => {
            if positions.len() < 2 {
                return Err(SkipReason::DegenerateLine);
            }
            let first = positions.first().and_then(|p| lng_lat(p));
            let last = positions.last().and_then(|p| lng_lat(p));
            first.zip(last).ok_or(SkipReason::DegenerateLine)
        }
        // assumes the parts are ordered end to end
        Value::MultiLineString(parts) if fields.accept_multi_line_strings => {
            let first = parts.first().and_then(|part| part.first()).and_then(|p| lng_lat(p));
            let last = parts.last().and_then(|part| part.last()).and_then(|p| lng_lat(p));
            first.zip(last).ok_or(SkipReason::DegenerateLine)
        }
        other => {
            log::warn!("Unexpected geometry type {}", geometry_type(other));
            Err(SkipReason::UnsupportedGeometry)
        }
    }
}

fn lng_lat(position: &[f64]) -> Option<LngLat> {
    match position {
        [lng, lat, ..] if lng.is_finite() && lat.is_finite() => Some((*lng, *lat)),
        _ => None,
    }
}

/// Accepts integer ids given as JSON numbers or numeric strings.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn parse_id(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

const fn geometry_type(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

#[cfg(test)]
mod tests {
    use missing_streets_street_models::SectorPairing;
    use missing_streets_street_models::progress::null_progress;
    use serde_json::json;

    use super::*;

    fn feature(properties: serde_json::Value, geometry: Option<Value>) -> Feature {
        Feature {
            bbox: None,
            geometry: geometry.map(Geometry::new),
            id: None,
            properties: properties.as_object().cloned(),
            foreign_members: None,
        }
    }

    fn line(coords: &[[f64; 2]]) -> Value {
        Value::LineString(coords.iter().map(|c| c.to_vec()).collect())
    }

    fn main_street() -> Feature {
        feature(
            json!({ "OBJECTID": 1, "FULLNAME": "MAIN ST" }),
            Some(line(&[[-111.0, 40.0], [-111.0, 40.0045]])),
        )
    }

    #[test]
    fn builds_street_from_line_feature() {
        let grid = SectorGrid::default();
        let (sector_id, street) =
            street_from_feature(&main_street(), &AuthoritativeFields::default(), &grid).unwrap();

        assert_eq!(sector_id, sector(&grid, 40.0, -111.0));
        assert_eq!(street.road_id, 1);
        assert_eq!(street.name, "Main Street");
        assert_eq!(street.name_code, "mainstreet");
        assert!((street.lat - 40.0).abs() < f64::EPSILON);
        assert!((street.lng + 111.0).abs() < f64::EPSILON);
        // 0.0045 degrees of latitude
        assert!((street.street_length - 500.4).abs() < 1.0, "{}", street.street_length);
    }

    #[test]
    fn falls_back_to_secondary_name_field() {
        let feature = feature(
            json!({ "OBJECTID": "42", "FULLNAME": "", "NAME": "CANYON RD" }),
            Some(line(&[[-111.0, 40.0], [-111.0, 40.001]])),
        );
        let (_, street) = street_from_feature(
            &feature,
            &AuthoritativeFields::default(),
            &SectorGrid::default(),
        )
        .unwrap();
        assert_eq!(street.name, "Canyon Road");
        assert_eq!(street.road_id, 42);
    }

    #[test]
    fn skips_unnamed_and_geometryless_features() {
        let fields = AuthoritativeFields::default();
        let grid = SectorGrid::default();

        let unnamed = feature(
            json!({ "OBJECTID": 1, "FULLNAME": "   " }),
            Some(line(&[[-111.0, 40.0], [-111.0, 40.001]])),
        );
        assert_eq!(
            street_from_feature(&unnamed, &fields, &grid),
            Err(SkipReason::Unnamed)
        );

        let no_geometry = feature(json!({ "OBJECTID": 1, "FULLNAME": "MAIN ST" }), None);
        assert_eq!(
            street_from_feature(&no_geometry, &fields, &grid),
            Err(SkipReason::NoGeometry)
        );
    }

    #[test]
    fn skips_features_without_integer_id() {
        let feature = feature(
            json!({ "OBJECTID": "abc", "FULLNAME": "MAIN ST" }),
            Some(line(&[[-111.0, 40.0], [-111.0, 40.001]])),
        );
        assert_eq!(
            street_from_feature(
                &feature,
                &AuthoritativeFields::default(),
                &SectorGrid::default()
            ),
            Err(SkipReason::MissingId)
        );
    }

    #[test]
    fn rejects_multi_line_strings_by_default() {
        let multi = feature(
            json!({ "OBJECTID": 1, "FULLNAME": "MAIN ST" }),
            Some(Value::MultiLineString(vec![
                vec![vec![-111.0, 40.0], vec![-111.0, 40.001]],
                vec![vec![-111.0, 40.001], vec![-111.0, 40.002]],
            ])),
        );
        let grid = SectorGrid::default();

        assert_eq!(
            street_from_feature(&multi, &AuthoritativeFields::default(), &grid),
            Err(SkipReason::UnsupportedGeometry)
        );

        let fields = AuthoritativeFields {
            accept_multi_line_strings: true,
            ..AuthoritativeFields::default()
        };
        let (_, street) = street_from_feature(&multi, &fields, &grid).unwrap();
        // first of the first part to last of the last part
        assert!((street.street_length - 222.4).abs() < 1.0);
    }

    #[test]
    fn rejects_points_and_single_position_lines() {
        let fields = AuthoritativeFields::default();
        let grid = SectorGrid::default();

        let point = feature(
            json!({ "OBJECTID": 1, "FULLNAME": "MAIN ST" }),
            Some(Value::Point(vec![-111.0, 40.0])),
        );
        assert_eq!(
            street_from_feature(&point, &fields, &grid),
            Err(SkipReason::UnsupportedGeometry)
        );

        let stub = feature(
            json!({ "OBJECTID": 1, "FULLNAME": "MAIN ST" }),
            Some(line(&[[-111.0, 40.0]])),
        );
        assert_eq!(
            street_from_feature(&stub, &fields, &grid),
            Err(SkipReason::DegenerateLine)
        );
    }

    #[test]
    fn drops_lines_spanning_two_sectors() {
        let grid = SectorGrid {
            scale: 1.0,
            lon_anchor: 0.0,
            lat_anchor: 0.0,
            pairing: SectorPairing::Packed,
        };
        let crossing = feature(
            json!({ "OBJECTID": 7, "FULLNAME": "LONG HWY" }),
            Some(line(&[[10.4, 0.0], [10.6, 0.0]])),
        );
        assert_eq!(
            street_from_feature(&crossing, &AuthoritativeFields::default(), &grid),
            Err(SkipReason::CrossSector)
        );

        let (index, stats) = build(
            &[crossing],
            &AuthoritativeFields::default(),
            &grid,
            &null_progress(),
        );
        assert!(index.is_empty());
        assert_eq!(stats.skipped_cross_sector, 1);
    }

    #[test]
    fn build_groups_by_sector_in_source_order() {
        let second = feature(
            json!({ "OBJECTID": 2, "FULLNAME": "1ST AVE" }),
            Some(line(&[[-111.0, 40.0], [-111.001, 40.0]])),
        );
        let (index, stats) = build(
            &[main_street(), second],
            &AuthoritativeFields::default(),
            &SectorGrid::default(),
            &null_progress(),
        );

        assert_eq!(stats.indexed, 2);
        assert_eq!(index.len(), 2);
        let streets = &index.sectors[&sector(&SectorGrid::default(), 40.0, -111.0)];
        assert_eq!(streets[0].road_id, 1);
        assert_eq!(streets[1].road_id, 2);
        assert_eq!(streets[1].name, "1st Avenue");
    }
}
