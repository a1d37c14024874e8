//! # Gapfill - Void Filling for Elevation Rasters
//!
//! Fills data holes in a primary elevation raster from a secondary,
//! differently-sourced raster over the same area, producing one gap-free
//! grid that keeps every valid primary value and blends auxiliary data only
//! where the primary has none.
//!
//! ## How it works
//!
//! 1. **Mask** - cells carrying the hole sentinel (`-9999` by default) are
//!    marked as holes.
//! 2. **Buffer** - the hole mask grows outward by a ground distance (meters,
//!    not cells), yielding a ring of intact cells around every hole.
//! 3. **Sample** - a percentage of the auxiliary raster's valid cells is
//!    drawn uniformly at random.
//! 4. **Compose** - ring values (real elevations at the hole's rim) and the
//!    samples form a sparse support surface.
//! 5. **Interpolate** - the support surface is null-filled, bilinear or
//!    spline-like.
//! 6. **Patch** - the primary raster is laid over the fill; its sentinel
//!    cells become true absence so fill shows through there and nowhere
//!    else.
//!
//! The working region is an explicit value recomputed at every stage, and
//! all intermediates live under run-private names that are removed on every
//! exit path.
//!
//! ## Quick Start
//!
//! ```
//! use gapfill::{FillOptions, Raster, RasterStore, Region, VoidFillPipeline};
//!
//! # fn main() -> gapfill::Result<()> {
//! let region = Region::from_grid(0.0, 300.0, 10, 10, 30.0, 30.0)?;
//! let mut primary = Raster::filled(region, 420.0);
//! primary.set(5, 5, -9999.0); // a data hole
//! let auxiliary = Raster::filled(region, 400.0);
//!
//! let mut store = RasterStore::new();
//! store.write("primary", primary);
//! store.write("auxiliary", auxiliary);
//!
//! let pipeline = VoidFillPipeline::new(FillOptions::default());
//! let report = pipeline.run(&mut store, "primary", "auxiliary", "filled")?;
//! assert_eq!(report.cells_filled, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Tile I/O
//!
//! The [`hgt`] module reads and writes SRTM-layout `.hgt` tiles (also from
//! `.hgt.zip` archives), converting the -32768 void value to true absence
//! and deriving the metric cell size from the tile latitude.

pub mod buffer;
pub mod compose;
pub mod error;
pub mod filename;
pub mod hgt;
pub mod interpolate;
pub mod mask;
pub mod patch;
pub mod pipeline;
pub mod raster;
pub mod region;
pub mod sample;
pub mod store;

// Re-export main types at crate root for convenience
pub use error::{FillError, Result};
pub use hgt::{HgtResolution, HgtTile, HGT_VOID};
pub use interpolate::FillMethod;
pub use pipeline::{FillOptions, FillReport, Stage, VoidFillPipeline};
pub use raster::Raster;
pub use region::{CellSize, Region};
pub use sample::{Sample, SampleSet};
pub use store::{RasterStore, Scratch};
