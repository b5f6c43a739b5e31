//! Haversine distance.

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two points.
///
/// Ignores ellipsoidal flattening. Symmetric, non-negative, and exactly
/// zero for identical points.
#[must_use]
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_apart() {
        for (lat, lng) in [(0.0, 0.0), (40.0, -111.0), (-41.29, 174.78), (89.9, 179.9)] {
            assert!(distance(lat, lng, lat, lng).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn is_symmetric() {
        let ab = distance(40.0, -111.0, 40.7, -111.9);
        let ba = distance(40.7, -111.9, 40.0, -111.0);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_latitude() {
        // pi * R / 180
        let d = distance(40.0, -111.0, 41.0, -111.0);
        assert!((d - 111_194.9).abs() < 1.0, "got {d}");
    }

    #[test]
    fn short_street_length() {
        // ~15.6 m between (40.0, -111.0) and (40.0001, -111.0001)
        let d = distance(40.0, -111.0, 40.0001, -111.0001);
        assert!(d > 10.0 && d < 20.0, "got {d}");
    }

    #[test]
    fn is_non_negative() {
        assert!(distance(-45.0, 170.0, 45.0, -170.0) > 0.0);
    }
}
