//! Metric buffering of hole masks.
//!
//! Growing the hole mask by a ground distance yields the blend ring: the
//! band of intact cells just outside each hole whose real values anchor the
//! interpolation at the hole's rim. Distances are meters, not cells, so the
//! ring width adapts to whatever resolution the raster has.

use tracing::debug;

use crate::raster::Raster;
use crate::region::CellSize;

/// Zone value for the original mask footprint.
pub const HOLE_ZONE: f64 = 1.0;

/// Zone value for the grown ring outside the footprint.
pub const RING_ZONE: f64 = 2.0;

/// Grow `mask` outward by `distance` meters.
///
/// Output zones: [`HOLE_ZONE`] on the original mask footprint, [`RING_ZONE`]
/// on cells whose center lies within `distance` of a footprint cell center,
/// absent beyond. `cell` supplies the ground size of one cell per axis, so
/// the ring is measured in true ground distance on anisotropic grids.
///
/// A `distance` of zero produces an empty ring. A distance larger than the
/// extent simply turns the whole region into ring; that is allowed, it only
/// costs more downstream.
pub fn grow(mask: &Raster, distance: f64, cell: CellSize) -> Raster {
    let rows = mask.rows();
    let cols = mask.cols();
    let mut zones = Raster::absent(mask.region());

    // Offsets whose center-to-center ground distance is within range.
    let reach_x = (distance / cell.ew).floor() as isize;
    let reach_y = (distance / cell.ns).floor() as isize;
    let mut offsets = Vec::new();
    for dy in -reach_y..=reach_y {
        for dx in -reach_x..=reach_x {
            if dx == 0 && dy == 0 {
                continue;
            }
            let gx = dx as f64 * cell.ew;
            let gy = dy as f64 * cell.ns;
            if gx * gx + gy * gy <= distance * distance {
                offsets.push((dy, dx));
            }
        }
    }

    for row in 0..rows {
        for col in 0..cols {
            if mask.is_absent(row, col) {
                continue;
            }
            for (dy, dx) in &offsets {
                let r = row as isize + dy;
                let c = col as isize + dx;
                if r >= 0 && c >= 0 {
                    zones.set(r as usize, c as usize, RING_ZONE);
                }
            }
        }
    }

    // The footprint itself wins over any ring stamped across it.
    for row in 0..rows {
        for col in 0..cols {
            if !mask.is_absent(row, col) {
                zones.set(row, col, HOLE_ZONE);
            }
        }
    }

    debug!(
        "buffered mask by {distance} m: {} ring cells around {} hole cells",
        zones.count_equal(RING_ZONE),
        zones.count_equal(HOLE_ZONE)
    );
    zones
}
