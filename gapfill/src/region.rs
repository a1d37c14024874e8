//! Working-extent bookkeeping.
//!
//! Every raster operation in this crate is evaluated against an explicit
//! [`Region`]: a rectangular, cell-aligned window with a fixed resolution.
//! The region is passed as a value into each pipeline stage and recomputed at
//! every stage boundary, so there is no process-global extent that can go
//! stale between operations.

use crate::error::{FillError, Result};

/// Tolerance when snapping coordinates onto a cell grid.
const GRID_EPSILON: f64 = 1e-6;

/// Ground size of one raster cell, in meters per axis.
///
/// Buffer distances are metric, so callers working in non-metric map units
/// (e.g. degrees) supply the true ground size of a cell here. For tiles in
/// geographic coordinates the east-west extent shrinks with latitude, hence
/// the two axes are kept separate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    /// East-west cell extent in meters.
    pub ew: f64,
    /// North-south cell extent in meters.
    pub ns: f64,
}

impl CellSize {
    /// A square cell of `meters` per side.
    pub fn square(meters: f64) -> Self {
        Self {
            ew: meters,
            ns: meters,
        }
    }
}

/// A rectangular, cell-aligned extent with a fixed cell resolution.
///
/// Bounds are in map units; `north`/`south` bound the vertical axis and
/// `east`/`west` the horizontal one. Rows run north to south, columns west
/// to east, and cell centers sit half a resolution step inside the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Northern bound.
    pub north: f64,
    /// Southern bound.
    pub south: f64,
    /// Eastern bound.
    pub east: f64,
    /// Western bound.
    pub west: f64,
    /// East-west cell resolution in map units.
    pub ew_res: f64,
    /// North-south cell resolution in map units.
    pub ns_res: f64,
}

/// Number of resolution steps from `origin` to `v`.
fn steps(origin: f64, v: f64, res: f64) -> f64 {
    (v - origin) / res
}

/// Floor that forgives floating-point noise just below a whole step.
fn snap_floor(t: f64) -> f64 {
    let r = t.round();
    if (t - r).abs() < GRID_EPSILON {
        r
    } else {
        t.floor()
    }
}

/// Ceiling that forgives floating-point noise just above a whole step.
fn snap_ceil(t: f64) -> f64 {
    let r = t.round();
    if (t - r).abs() < GRID_EPSILON {
        r
    } else {
        t.ceil()
    }
}

impl Region {
    /// Create a region from explicit bounds and resolution.
    ///
    /// # Errors
    ///
    /// Returns [`FillError::InvalidRegion`] if the bounds are inverted or
    /// empty, or if either resolution is not strictly positive.
    pub fn new(
        north: f64,
        south: f64,
        east: f64,
        west: f64,
        ew_res: f64,
        ns_res: f64,
    ) -> Result<Self> {
        if !(ew_res > 0.0) || !(ns_res > 0.0) {
            return Err(FillError::InvalidRegion {
                reason: format!("non-positive resolution: ew={ew_res}, ns={ns_res}"),
            });
        }
        if north <= south || east <= west {
            return Err(FillError::InvalidRegion {
                reason: format!("empty extent: n={north} s={south} e={east} w={west}"),
            });
        }
        Ok(Self {
            north,
            south,
            east,
            west,
            ew_res,
            ns_res,
        })
    }

    /// Create a region anchored at its northwest corner with a given grid
    /// shape.
    pub fn from_grid(
        west: f64,
        north: f64,
        rows: usize,
        cols: usize,
        ew_res: f64,
        ns_res: f64,
    ) -> Result<Self> {
        Self::new(
            north,
            north - rows as f64 * ns_res,
            west + cols as f64 * ew_res,
            west,
            ew_res,
            ns_res,
        )
    }

    /// Number of rows covered by this region.
    pub fn rows(&self) -> usize {
        ((self.north - self.south) / self.ns_res).round() as usize
    }

    /// Number of columns covered by this region.
    pub fn cols(&self) -> usize {
        ((self.east - self.west) / self.ew_res).round() as usize
    }

    /// Total cell count.
    pub fn cells(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Map-unit coordinates of the center of cell `(row, col)`.
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.west + (col as f64 + 0.5) * self.ew_res,
            self.north - (row as f64 + 0.5) * self.ns_res,
        )
    }

    /// Row containing the vertical coordinate `y`, if inside the region.
    pub fn row_of(&self, y: f64) -> Option<usize> {
        let t = (self.north - y) / self.ns_res;
        if t < -GRID_EPSILON {
            return None;
        }
        let row = t.floor().max(0.0) as usize;
        (row < self.rows()).then_some(row)
    }

    /// Column containing the horizontal coordinate `x`, if inside the region.
    pub fn col_of(&self, x: f64) -> Option<usize> {
        let t = (x - self.west) / self.ew_res;
        if t < -GRID_EPSILON {
            return None;
        }
        let col = t.floor().max(0.0) as usize;
        (col < self.cols()).then_some(col)
    }

    /// Whether the point `(x, y)` lies inside the region.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.col_of(x).is_some() && self.row_of(y).is_some()
    }

    /// Re-snap this region's bounds outward onto the cell lattice of `grid`.
    ///
    /// The result covers at least the same area and adopts `grid`'s
    /// resolution. For a region already on the lattice this is the identity.
    pub fn align_to(&self, grid: &Region) -> Region {
        let ew = grid.ew_res;
        let ns = grid.ns_res;
        Region {
            west: grid.west + snap_floor(steps(grid.west, self.west, ew)) * ew,
            east: grid.west + snap_ceil(steps(grid.west, self.east, ew)) * ew,
            north: grid.north - snap_floor(steps(self.north, grid.north, ns)) * ns,
            south: grid.north - snap_ceil(steps(self.south, grid.north, ns)) * ns,
            ew_res: ew,
            ns_res: ns,
        }
    }

    /// Smallest region covering both operands, on this region's lattice.
    pub fn union(&self, other: &Region) -> Region {
        Region {
            north: self.north.max(other.north),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            west: self.west.min(other.west),
            ew_res: self.ew_res,
            ns_res: self.ns_res,
        }
        .align_to(self)
    }

    /// Overlap of both operands on this region's lattice, if any.
    pub fn intersect(&self, other: &Region) -> Option<Region> {
        let north = self.north.min(other.north);
        let south = self.south.max(other.south);
        let east = self.east.min(other.east);
        let west = self.west.max(other.west);
        if north - south < GRID_EPSILON || east - west < GRID_EPSILON {
            return None;
        }
        Some(
            Region {
                north,
                south,
                east,
                west,
                ew_res: self.ew_res,
                ns_res: self.ns_res,
            }
            .align_to(self),
        )
    }
}
