//! Null-filling over a sparse support surface.
//!
//! Two methods are offered. `Bilinear` looks along the four grid axes for
//! the nearest support value in each direction and blends them with inverse
//! distance weights. `Spline` seeds from the support cells and relaxes
//! absent cells against their neighbors until the surface converges, which
//! tolerates much sparser support at the cost of more passes.

use tracing::{debug, warn};

use crate::raster::Raster;

/// Interpolation method used to close gaps in the support surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMethod {
    /// Four-direction scanline blend, inverse-distance weighted.
    #[default]
    Bilinear,
    /// Iterative neighbor relaxation.
    Spline,
}

/// Relaxation sweeps applied after the spline fill converges.
const SMOOTH_PASSES: usize = 2;

/// Fill the absent cells of `surface` from its valid cells.
///
/// Support cells are passed through unchanged. A surface without a single
/// valid cell is not an error: some tiles legitimately have nothing to fill,
/// so the result is returned all-absent with a warning. Cells that no valid
/// neighbor can reach (bilinear only) stay absent and surface downstream as
/// residual holes.
pub fn fill(surface: &Raster, method: FillMethod) -> Raster {
    if surface.valid_count() == 0 {
        warn!("support surface has no valid cells, returning it unfilled");
        return surface.clone();
    }
    match method {
        FillMethod::Bilinear => bilinear_fill(surface),
        FillMethod::Spline => relaxation_fill(surface),
    }
}

/// Nearest valid value along one scan direction, per cell, with its
/// map-unit distance.
type Nearest = Vec<Option<(f64, f64)>>;

fn bilinear_fill(surface: &Raster) -> Raster {
    let rows = surface.rows();
    let cols = surface.cols();
    let ew = surface.region().ew_res;
    let ns = surface.region().ns_res;

    let mut west: Nearest = vec![None; rows * cols];
    let mut east: Nearest = vec![None; rows * cols];
    let mut north: Nearest = vec![None; rows * cols];
    let mut south: Nearest = vec![None; rows * cols];

    for row in 0..rows {
        let mut last: Option<(usize, f64)> = None;
        for col in 0..cols {
            match surface.get(row, col) {
                Some(v) => last = Some((col, v)),
                None => {
                    if let Some((c, v)) = last {
                        west[row * cols + col] = Some((v, (col - c) as f64 * ew));
                    }
                }
            }
        }
        last = None;
        for col in (0..cols).rev() {
            match surface.get(row, col) {
                Some(v) => last = Some((col, v)),
                None => {
                    if let Some((c, v)) = last {
                        east[row * cols + col] = Some((v, (c - col) as f64 * ew));
                    }
                }
            }
        }
    }

    for col in 0..cols {
        let mut last: Option<(usize, f64)> = None;
        for row in 0..rows {
            match surface.get(row, col) {
                Some(v) => last = Some((row, v)),
                None => {
                    if let Some((r, v)) = last {
                        north[row * cols + col] = Some((v, (row - r) as f64 * ns));
                    }
                }
            }
        }
        last = None;
        for row in (0..rows).rev() {
            match surface.get(row, col) {
                Some(v) => last = Some((row, v)),
                None => {
                    if let Some((r, v)) = last {
                        south[row * cols + col] = Some((v, (r - row) as f64 * ns));
                    }
                }
            }
        }
    }

    let mut out = surface.clone();
    let mut unreachable = 0usize;
    for row in 0..rows {
        for col in 0..cols {
            if !surface.is_absent(row, col) {
                continue;
            }
            let i = row * cols + col;
            let mut value = 0.0;
            let mut weight = 0.0;
            for nearest in [&west[i], &east[i], &north[i], &south[i]] {
                if let Some((v, d)) = nearest {
                    let w = 1.0 / d;
                    value += w * v;
                    weight += w;
                }
            }
            if weight > 0.0 {
                out.set(row, col, value / weight);
            } else {
                unreachable += 1;
            }
        }
    }
    if unreachable > 0 {
        debug!("bilinear fill left {unreachable} cells without axis support");
    }
    out
}

fn relaxation_fill(surface: &Raster) -> Raster {
    let rows = surface.rows();
    let cols = surface.cols();
    let mut out = surface.clone();

    let neighbor_mean = |grid: &Raster, row: usize, col: usize| -> Option<f64> {
        let mut sum = 0.0;
        let mut n = 0usize;
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dy == 0 && dx == 0 {
                    continue;
                }
                let r = row as i64 + dy;
                let c = col as i64 + dx;
                if r < 0 || c < 0 {
                    continue;
                }
                if let Some(v) = grid.get(r as usize, c as usize) {
                    sum += v;
                    n += 1;
                }
            }
        }
        (n > 0).then(|| sum / n as f64)
    };

    // Grow the filled area out from the support cells until nothing is left
    // to fill. Each round advances the frontier by one cell, so the fill
    // cannot take more rounds than the grid diameter.
    for round in 1..=(rows + cols) {
        let mut updates = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                if out.is_absent(row, col) {
                    if let Some(mean) = neighbor_mean(&out, row, col) {
                        updates.push((row, col, mean));
                    }
                }
            }
        }
        if updates.is_empty() {
            break;
        }
        debug!("relaxation round {round}: filled {} cells", updates.len());
        for (row, col, value) in updates {
            out.set(row, col, value);
        }
    }

    // Relax the filled cells (never the support) a few more times to take
    // the frontier seams out of the surface.
    for _ in 0..SMOOTH_PASSES {
        let mut updates = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                if surface.is_absent(row, col) && !out.is_absent(row, col) {
                    if let Some(mean) = neighbor_mean(&out, row, col) {
                        updates.push((row, col, mean));
                    }
                }
            }
        }
        for (row, col, value) in updates {
            out.set(row, col, value);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;

    fn surface(rows: usize, cols: usize) -> Raster {
        let region = Region::from_grid(0.0, rows as f64 * 30.0, rows, cols, 30.0, 30.0).unwrap();
        Raster::absent(region)
    }

    #[test]
    fn test_all_absent_is_recoverable() {
        let s = surface(4, 4);
        for method in [FillMethod::Bilinear, FillMethod::Spline] {
            let out = fill(&s, method);
            assert_eq!(out.valid_count(), 0);
        }
    }

    #[test]
    fn test_support_cells_pass_through_unchanged() {
        let mut s = surface(3, 3);
        s.set(0, 0, 111.0);
        s.set(2, 2, 333.0);
        for method in [FillMethod::Bilinear, FillMethod::Spline] {
            let out = fill(&s, method);
            assert_eq!(out.get(0, 0), Some(111.0));
            assert_eq!(out.get(2, 2), Some(333.0));
        }
    }

    #[test]
    fn test_bilinear_blends_four_directions() {
        let mut s = surface(3, 3);
        s.set(0, 1, 10.0); // north
        s.set(2, 1, 20.0); // south
        s.set(1, 0, 30.0); // west
        s.set(1, 2, 40.0); // east
        let out = fill(&s, FillMethod::Bilinear);
        // All four anchors sit one cell away, so the blend is their mean.
        let center = out.get(1, 1).unwrap();
        assert!((center - 25.0).abs() < 1e-9, "got {center}");
    }

    #[test]
    fn test_bilinear_weights_by_distance() {
        let mut s = surface(1, 5);
        s.set(0, 0, 0.0);
        s.set(0, 4, 100.0);
        let out = fill(&s, FillMethod::Bilinear);
        // Cell 1 is 1 step from the left anchor, 3 from the right.
        let v = out.get(0, 1).unwrap();
        assert!((v - 25.0).abs() < 1e-9, "got {v}");
        // Midpoint blends evenly.
        let mid = out.get(0, 2).unwrap();
        assert!((mid - 50.0).abs() < 1e-9, "got {mid}");
    }

    #[test]
    fn test_bilinear_leaves_unreachable_cells_absent() {
        let mut s = surface(3, 3);
        s.set(0, 0, 5.0);
        let out = fill(&s, FillMethod::Bilinear);
        // Same row or column as the anchor: reachable.
        assert_eq!(out.get(0, 2), Some(5.0));
        assert_eq!(out.get(2, 0), Some(5.0));
        // No support anywhere on row 1 / column 1.
        assert!(out.is_absent(1, 1));
        assert!(out.is_absent(1, 2));
    }

    #[test]
    fn test_spline_floods_from_single_support_cell() {
        let mut s = surface(5, 5);
        s.set(2, 2, 777.0);
        let out = fill(&s, FillMethod::Spline);
        assert_eq!(out.valid_count(), 25);
        for row in 0..5 {
            for col in 0..5 {
                let v = out.get(row, col).unwrap();
                assert!((v - 777.0).abs() < 1e-9, "cell ({row},{col}) = {v}");
            }
        }
    }

    #[test]
    fn test_spline_fill_stays_within_support_range() {
        let mut s = surface(4, 4);
        s.set(0, 0, 100.0);
        s.set(3, 3, 200.0);
        let out = fill(&s, FillMethod::Spline);
        assert_eq!(out.valid_count(), 16);
        for row in 0..4 {
            for col in 0..4 {
                let v = out.get(row, col).unwrap();
                assert!((100.0..=200.0).contains(&v), "cell ({row},{col}) = {v}");
            }
        }
    }
}
