//! Blending of rim anchors and auxiliary samples into one support surface.

use tracing::debug;

use crate::buffer::RING_ZONE;
use crate::raster::Raster;
use crate::region::Region;
use crate::sample::SampleSet;

/// Merge the buffered boundary with the auxiliary samples over `region`.
///
/// Ring cells (zone 2 of `zones`) take their value from `boundary_source` —
/// real elevations along the hole's rim that anchor the interpolation. Cells
/// covered by a sample take the sample value; ring anchors win where both
/// apply. Everything else stays absent, so the result is a sparse surface
/// bracketing each hole from its rim and its interior.
pub fn compose(
    zones: &Raster,
    boundary_source: &Raster,
    samples: &SampleSet,
    region: &Region,
) -> Raster {
    let mut surface = Raster::absent(*region);

    for row in 0..region.rows() {
        for col in 0..region.cols() {
            let (x, y) = region.cell_center(row, col);
            if zones.value_at(x, y) == Some(RING_ZONE) {
                if let Some(value) = boundary_source.value_at(x, y) {
                    surface.set(row, col, value);
                }
            }
        }
    }

    let mut placed = 0usize;
    for s in samples.iter() {
        if let (Some(row), Some(col)) = (region.row_of(s.y), region.col_of(s.x)) {
            if surface.is_absent(row, col) {
                surface.set(row, col, s.value);
                placed += 1;
            }
        }
    }

    debug!(
        "composed support surface: {} anchor+sample cells ({placed} from samples)",
        surface.valid_count()
    );
    surface
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{grow, HOLE_ZONE};
    use crate::mask::extract_mask;
    use crate::region::CellSize;
    use crate::sample;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// 5x5 primary with a single hole in the center.
    fn primary() -> Raster {
        let region = Region::from_grid(0.0, 150.0, 5, 5, 30.0, 30.0).unwrap();
        let mut r = Raster::filled(region, 500.0);
        r.set(2, 2, -9999.0);
        r
    }

    #[test]
    fn test_ring_cells_take_boundary_values() {
        let primary = primary();
        let mask = extract_mask(&primary, -9999.0);
        let zones = grow(&mask, 30.0, CellSize::square(30.0));
        let region = primary.region();

        let surface = compose(&zones, &primary, &SampleSet::default(), &region);

        // The four axis neighbors of the hole are ring cells with real values.
        assert_eq!(surface.get(1, 2), Some(500.0));
        assert_eq!(surface.get(3, 2), Some(500.0));
        assert_eq!(surface.get(2, 1), Some(500.0));
        assert_eq!(surface.get(2, 3), Some(500.0));
        // The hole itself stays absent.
        assert_eq!(zones.get(2, 2), Some(HOLE_ZONE));
        assert!(surface.is_absent(2, 2));
        // Far corner is neither ring nor sample.
        assert!(surface.is_absent(0, 0));
    }

    #[test]
    fn test_samples_fill_non_ring_cells() {
        let primary = primary();
        let mask = extract_mask(&primary, -9999.0);
        let zones = grow(&mask, 30.0, CellSize::square(30.0));
        let region = primary.region();

        let auxiliary = Raster::filled(region, 42.0);
        let mut rng = StdRng::seed_from_u64(11);
        let samples = sample::sample(&auxiliary, &region, 100, &mut rng).unwrap();

        let surface = compose(&zones, &primary, &samples, &region);

        // Every cell is covered: ring anchors keep the primary's 500,
        // everything else carries the sampled 42.
        assert_eq!(surface.valid_count(), 25);
        assert_eq!(surface.get(1, 2), Some(500.0));
        assert_eq!(surface.get(0, 0), Some(42.0));
        assert_eq!(surface.get(2, 2), Some(42.0));
    }

    #[test]
    fn test_empty_ring_and_samples_yield_empty_surface() {
        let primary = primary();
        let mask = extract_mask(&primary, -9999.0);
        let zones = grow(&mask, 0.0, CellSize::square(30.0));
        let region = primary.region();

        let surface = compose(&zones, &primary, &SampleSet::default(), &region);
        assert_eq!(surface.valid_count(), 0);
    }

    #[test]
    fn test_compose_over_larger_region() {
        let primary = primary();
        let mask = extract_mask(&primary, -9999.0);
        let zones = grow(&mask, 30.0, CellSize::square(30.0));
        // Region twice as wide as the primary.
        let region = Region::from_grid(0.0, 150.0, 5, 10, 30.0, 30.0).unwrap();

        let surface = compose(&zones, &primary, &SampleSet::default(), &region);
        assert_eq!(surface.cols(), 10);
        assert_eq!(surface.get(1, 2), Some(500.0));
        // Cells beyond the primary's extent stay absent.
        assert!(surface.is_absent(1, 7));
    }
}
