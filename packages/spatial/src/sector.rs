//! Coarse spatial buckets.
//!
//! Points are snapped to a regular grid of `1 / scale` degrees anchored at
//! `(lon_anchor, lat_anchor)`. Two points a few meters apart can still land
//! in adjacent cells; callers accept that approximation.

use missing_streets_street_models::{Sector, SectorGrid, SectorPairing};

/// Grid cell `(column, row)` of a point.
///
/// Halves round toward positive infinity.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn sector_cell(grid: &SectorGrid, lat: f64, lng: f64) -> (i64, i64) {
    let column = round_half_up(grid.scale * (lng - grid.lon_anchor));
    let row = round_half_up(grid.scale * (grid.lat_anchor - lat));
    (column as i64, row as i64)
}

/// Sector id of a point.
#[must_use]
pub fn sector(grid: &SectorGrid, lat: f64, lng: f64) -> Sector {
    let (column, row) = sector_cell(grid, lat, lng);
    match grid.pairing {
        SectorPairing::Packed => (column << 32) | (row & 0xFFFF_FFFF),
        SectorPairing::Multiplicative => column * row,
    }
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(pairing: SectorPairing) -> SectorGrid {
        SectorGrid {
            scale: 1.0,
            lon_anchor: 0.0,
            lat_anchor: 0.0,
            pairing,
        }
    }

    #[test]
    fn is_deterministic() {
        let grid = SectorGrid::default();
        assert_eq!(sector(&grid, -41.29, 174.78), sector(&grid, -41.29, 174.78));
        assert_eq!(sector(&grid, 40.0, -111.0), sector(&grid, 40.0, -111.0));
    }

    #[test]
    fn computes_cells_from_anchors() {
        let grid = SectorGrid::default();
        // 0.7 * (174.78 - 166) = 6.146, 0.7 * (-34 + 41.29) = 5.103
        assert_eq!(sector_cell(&grid, -41.29, 174.78), (6, 5));
    }

    #[test]
    fn rounds_halves_up() {
        let grid = grid(SectorPairing::Packed);
        assert_eq!(sector_cell(&grid, 0.0, 2.5), (3, 0));
        assert_eq!(sector_cell(&grid, 0.0, -2.5), (-2, 0));
    }

    #[test]
    fn nearby_points_share_a_sector() {
        let grid = SectorGrid::default();
        assert_eq!(sector(&grid, 40.0, -111.0), sector(&grid, 40.0001, -111.0001));
    }

    #[test]
    fn multiplicative_pairing_collides() {
        let grid = grid(SectorPairing::Multiplicative);
        // (column 2, row 3) and (column 3, row 2)
        assert_eq!(sector(&grid, -3.0, 2.0), sector(&grid, -2.0, 3.0));
        // anything on row 0 or column 0
        assert_eq!(sector(&grid, 0.0, 5.0), sector(&grid, -7.0, 0.0));
    }

    #[test]
    fn packed_pairing_separates_multiplicative_collisions() {
        let grid = grid(SectorPairing::Packed);
        assert_ne!(sector(&grid, -3.0, 2.0), sector(&grid, -2.0, 3.0));
        assert_ne!(sector(&grid, 0.0, 5.0), sector(&grid, -7.0, 0.0));
        assert_ne!(sector(&grid, 1.0, 1.0), sector(&grid, -1.0, -1.0));
    }

    #[test]
    fn packed_pairing_is_injective_on_a_neighborhood() {
        let grid = grid(SectorPairing::Packed);
        let mut seen = std::collections::BTreeSet::new();
        for column in -20..=20 {
            for row in -20..=20 {
                let id = sector(&grid, -f64::from(row), f64::from(column));
                assert!(seen.insert(id), "duplicate sector for ({column}, {row})");
            }
        }
    }
}
