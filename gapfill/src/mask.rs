//! Hole-mask derivation.

use tracing::debug;

use crate::raster::Raster;

/// Marker value for cells covered by a mask.
pub const MASK_PRESENT: f64 = 1.0;

/// Derive a hole mask from `source`: cells whose value equals `hole_value`
/// are marked present, every other cell is absent.
///
/// The mask marks holes rather than data because the buffer stage grows
/// outward from the holes. A source without any hole cells yields an
/// entirely absent mask, which the pipeline treats as "nothing to fill".
pub fn extract_mask(source: &Raster, hole_value: f64) -> Raster {
    let mut mask = Raster::absent(source.region());
    for row in 0..source.rows() {
        for col in 0..source.cols() {
            if source.get(row, col) == Some(hole_value) {
                mask.set(row, col, MASK_PRESENT);
            }
        }
    }
    debug!(
        "hole mask: {} of {} cells match {}",
        mask.valid_count(),
        source.region().cells(),
        hole_value
    );
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;

    fn source_with_holes() -> Raster {
        let region = Region::from_grid(0.0, 120.0, 4, 4, 30.0, 30.0).unwrap();
        let mut r = Raster::filled(region, 100.0);
        r.set(1, 1, -9999.0);
        r.set(2, 3, -9999.0);
        r
    }

    #[test]
    fn test_marks_only_hole_cells() {
        let mask = extract_mask(&source_with_holes(), -9999.0);
        assert_eq!(mask.valid_count(), 2);
        assert_eq!(mask.get(1, 1), Some(MASK_PRESENT));
        assert_eq!(mask.get(2, 3), Some(MASK_PRESENT));
        assert!(mask.is_absent(0, 0));
    }

    #[test]
    fn test_no_holes_yields_empty_mask() {
        let region = Region::from_grid(0.0, 60.0, 2, 2, 30.0, 30.0).unwrap();
        let mask = extract_mask(&Raster::filled(region, 5.0), -9999.0);
        assert_eq!(mask.valid_count(), 0);
    }

    #[test]
    fn test_absent_source_cells_are_not_holes() {
        let region = Region::from_grid(0.0, 60.0, 2, 2, 30.0, 30.0).unwrap();
        let mut r = Raster::filled(region, 5.0);
        r.clear(0, 0);
        let mask = extract_mask(&r, -9999.0);
        assert_eq!(mask.valid_count(), 0);
    }

    #[test]
    fn test_mask_shares_source_extent() {
        let src = source_with_holes();
        let mask = extract_mask(&src, -9999.0);
        assert_eq!(mask.region(), src.region());
    }
}
