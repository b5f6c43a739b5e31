//! Bounding boxes for output features.

use geo::BoundingRect;

/// Bounding box `[min_lng, min_lat, max_lng, max_lat]` of a geometry.
///
/// Returns `None` for geometries with no coordinates or that cannot be
/// represented as `geo` types.
#[must_use]
pub fn bbox(geometry: &geojson::Geometry) -> Option<[f64; 4]> {
    let geometry: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    let rect = geometry.bounding_rect()?;
    Some([rect.min().x, rect.min().y, rect.max().x, rect.max().y])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(coords: &[[f64; 2]]) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::LineString(
            coords.iter().map(|c| c.to_vec()).collect(),
        ))
    }

    #[test]
    fn straight_two_point_line() {
        let geometry = line(&[[-111.0, 40.0], [-111.1, 40.1]]);
        assert_eq!(bbox(&geometry), Some([-111.1, 40.0, -111.0, 40.1]));
    }

    #[test]
    fn covers_interior_vertices() {
        let geometry = line(&[[174.0, -41.0], [174.5, -40.2], [174.2, -41.3]]);
        assert_eq!(bbox(&geometry), Some([174.0, -41.3, 174.5, -40.2]));
    }

    #[test]
    fn empty_line_has_no_bbox() {
        assert_eq!(bbox(&line(&[])), None);
    }
}
