//! Final overlay of the primary raster onto the interpolated fill.

use crate::raster::Raster;
use crate::region::Region;

/// Lay `primary` over `fill` across `region`, converting `hole_value` cells
/// of the primary into true absence first.
///
/// The primary always wins where it has real data; fill values show through
/// exactly where the primary carried the hole sentinel (or was absent), and
/// nowhere else. Cells that neither input covers stay absent — those are the
/// residual, unfillable holes the caller can detect by rescanning. The
/// sentinel itself never survives into the output.
pub fn patch(primary: &Raster, fill: &Raster, hole_value: f64, region: &Region) -> Raster {
    let mut out = Raster::absent(*region);
    for row in 0..region.rows() {
        for col in 0..region.cols() {
            let (x, y) = region.cell_center(row, col);
            match primary.value_at(x, y) {
                Some(v) if v != hole_value => out.set(row, col, v),
                _ => {
                    if let Some(v) = fill.value_at(x, y) {
                        out.set(row, col, v);
                    }
                }
            }
        }
    }
    out
}
