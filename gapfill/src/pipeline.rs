//! The void-fill pipeline.
//!
//! [`VoidFillPipeline`] sequences mask derivation, metric buffering,
//! auxiliary sampling, blending, interpolation, and the final patch into one
//! run against a [`RasterStore`]. The working [`Region`] is recomputed at
//! every stage boundary and carried as an explicit value; each transition is
//! recorded so callers (and tests) can verify which extent every binary
//! operation ran against. Intermediate rasters live under run-private
//! scratch names and are removed on every exit, failures included.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::buffer::{self, RING_ZONE};
use crate::compose;
use crate::error::{FillError, Result};
use crate::interpolate::{self, FillMethod};
use crate::mask;
use crate::patch;
use crate::region::{CellSize, Region};
use crate::sample;
use crate::store::{RasterStore, Scratch};

/// Default numeric value marking data holes in the primary raster.
pub const DEFAULT_HOLE_VALUE: f64 = -9999.0;

/// Default percentage of auxiliary cells drawn as fill support.
pub const DEFAULT_SAMPLE_PERCENTAGE: u8 = 30;

/// Default buffer distance around holes, in meters (about two cells of
/// 1-arc-second data).
pub const DEFAULT_BUFFER_DISTANCE: f64 = 60.0;

/// Tuning knobs for a pipeline run.
///
/// # Example
///
/// ```
/// use gapfill::{FillMethod, FillOptions};
///
/// let options = FillOptions::default()
///     .sample_percentage(40)
///     .buffer_distance(90.0)
///     .method(FillMethod::Spline);
/// assert_eq!(options.sample_percentage, 40);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FillOptions {
    /// Numeric hole sentinel of the primary raster.
    pub hole_value: f64,
    /// Percentage (0-100) of valid auxiliary cells to sample.
    pub sample_percentage: u8,
    /// Ground distance in meters to grow the hole mask by.
    pub buffer_distance: f64,
    /// Interpolation method for the fill stage.
    pub method: FillMethod,
    /// Ground size of one cell, for rasters whose map units are not meters.
    /// `None` means map units are meters and the cell size follows from the
    /// region resolution.
    pub cell_size: Option<CellSize>,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            hole_value: DEFAULT_HOLE_VALUE,
            sample_percentage: DEFAULT_SAMPLE_PERCENTAGE,
            buffer_distance: DEFAULT_BUFFER_DISTANCE,
            method: FillMethod::default(),
            cell_size: None,
        }
    }
}

impl FillOptions {
    /// Set the hole sentinel value.
    pub fn hole_value(mut self, value: f64) -> Self {
        self.hole_value = value;
        self
    }

    /// Set the auxiliary sample percentage (0-100).
    pub fn sample_percentage(mut self, percentage: u8) -> Self {
        self.sample_percentage = percentage;
        self
    }

    /// Set the buffer distance in meters.
    pub fn buffer_distance(mut self, meters: f64) -> Self {
        self.buffer_distance = meters;
        self
    }

    /// Set the interpolation method.
    pub fn method(mut self, method: FillMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the ground size of one cell in meters.
    pub fn cell_size(mut self, cell: CellSize) -> Self {
        self.cell_size = Some(cell);
        self
    }
}

/// Pipeline stages, in execution order.
///
/// Every transition re-establishes the working region for the stage that
/// follows it; `Failed` is reachable from any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    MaskDerived,
    Buffered,
    AuxiliaryReady,
    Composed,
    Interpolated,
    Patched,
    Done,
    Failed,
}

/// Outcome of a successful pipeline run.
///
/// A run with `residual_holes > 0` still produced an output raster; the
/// leftover cells are true absence (never the sentinel) and the caller
/// decides whether partial coverage is acceptable.
#[derive(Debug, Clone)]
pub struct FillReport {
    /// Hole cells found in the primary raster.
    pub holes_detected: usize,
    /// Ring cells produced by the buffer stage.
    pub ring_cells: usize,
    /// Auxiliary samples drawn.
    pub samples_drawn: usize,
    /// Hole cells that received an interpolated value.
    pub cells_filled: usize,
    /// Hole cells the interpolation could not reach.
    pub residual_holes: usize,
    /// Whether the run returned the primary unchanged because it had no holes.
    pub short_circuited: bool,
    /// `(stage, working region)` per completed transition.
    pub trace: Vec<(Stage, Region)>,
}

impl FillReport {
    /// Whether every detected hole received a value.
    pub fn is_complete(&self) -> bool {
        self.residual_holes == 0
    }
}

/// Fills data holes in a primary raster from an auxiliary raster.
///
/// # Example
///
/// ```no_run
/// use gapfill::{FillOptions, RasterStore, VoidFillPipeline};
///
/// # fn demo(mut store: RasterStore) -> gapfill::Result<()> {
/// let pipeline = VoidFillPipeline::new(FillOptions::default());
/// let report = pipeline.run(&mut store, "primary", "auxiliary", "filled")?;
/// println!("filled {} of {} holes", report.cells_filled, report.holes_detected);
/// # Ok(())
/// # }
/// ```
pub struct VoidFillPipeline {
    options: FillOptions,
}

impl VoidFillPipeline {
    /// Create a pipeline with the given options.
    pub fn new(options: FillOptions) -> Self {
        Self { options }
    }

    /// The options this pipeline runs with.
    pub fn options(&self) -> &FillOptions {
        &self.options
    }

    /// Run the pipeline: read `primary` and `auxiliary` from `store`, write
    /// the gap-free result under `output`.
    ///
    /// On success the store holds `output` and no intermediates. On error
    /// nothing is written under `output`, the primary raster is untouched,
    /// and intermediates are swept all the same.
    pub fn run(
        &self,
        store: &mut RasterStore,
        primary: &str,
        auxiliary: &str,
        output: &str,
    ) -> Result<FillReport> {
        self.run_with_rng(store, primary, auxiliary, output, &mut rand::rng())
    }

    /// [`run`](Self::run) with a caller-supplied random source, for callers
    /// that need reproducible sampling.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        store: &mut RasterStore,
        primary: &str,
        auxiliary: &str,
        output: &str,
        rng: &mut R,
    ) -> Result<FillReport> {
        let mut scratch = Scratch::new();
        let result = self.execute(store, &mut scratch, primary, auxiliary, output, rng);
        scratch.sweep(store);
        if let Err(e) = &result {
            warn!("void fill aborted, intermediates swept: {e}");
        }
        result
    }

    fn execute<R: Rng + ?Sized>(
        &self,
        store: &mut RasterStore,
        scratch: &mut Scratch,
        primary: &str,
        auxiliary: &str,
        output: &str,
        rng: &mut R,
    ) -> Result<FillReport> {
        let opts = self.options;
        if opts.sample_percentage > 100 {
            return Err(FillError::InvalidPercentage {
                value: opts.sample_percentage,
            });
        }
        if !(opts.buffer_distance >= 0.0) {
            return Err(FillError::InvalidDistance {
                value: opts.buffer_distance,
            });
        }

        let primary_raster = store.read(primary)?.clone();
        let auxiliary_region = store.read(auxiliary)?.region();

        let mut region = primary_raster.region();
        let mut trace = vec![(Stage::Init, region)];

        let hole_mask = mask::extract_mask(&primary_raster, opts.hole_value);
        let holes_detected = hole_mask.valid_count();
        trace.push((Stage::MaskDerived, region));

        if holes_detected == 0 {
            info!(
                "primary raster '{primary}' has no {} cells, passing it through unchanged",
                opts.hole_value
            );
            store.write(output, primary_raster);
            trace.push((Stage::Done, region));
            return Ok(FillReport {
                holes_detected: 0,
                ring_cells: 0,
                samples_drawn: 0,
                cells_filled: 0,
                residual_holes: 0,
                short_circuited: true,
                trace,
            });
        }
        let mask_name = scratch.name("mask");
        store.write(&mask_name, hole_mask);

        let cell = opts.cell_size.unwrap_or(CellSize {
            ew: region.ew_res,
            ns: region.ns_res,
        });
        let zones = buffer::grow(store.read(&mask_name)?, opts.buffer_distance, cell);
        let ring_cells = zones.count_equal(RING_ZONE);
        region = zones.region();
        trace.push((Stage::Buffered, region));
        let zones_name = scratch.name("buffer");
        store.write(&zones_name, zones);

        // Region switch: sampling runs against the auxiliary raster's extent,
        // re-snapped onto the primary's lattice.
        region = auxiliary_region.align_to(&primary_raster.region());
        let samples =
            match sample::sample(store.read(auxiliary)?, &region, opts.sample_percentage, rng) {
                Ok(s) => s,
                Err(e) => {
                    debug!("{:?} -> {:?}", Stage::AuxiliaryReady, Stage::Failed);
                    return Err(e);
                }
            };
        let samples_drawn = samples.len();
        trace.push((Stage::AuxiliaryReady, region));

        let zones_ref = store.read(&zones_name)?;
        region = zones_ref.region().union(&region);
        let support = compose::compose(zones_ref, &primary_raster, &samples, &region);
        trace.push((Stage::Composed, region));
        let support_name = scratch.name("support");
        store.write(&support_name, support);

        let support_ref = store.read(&support_name)?;
        region = support_ref.region();
        let fill_surface = interpolate::fill(support_ref, opts.method);
        trace.push((Stage::Interpolated, region));
        let fill_name = scratch.name("fill");
        store.write(&fill_name, fill_surface);

        let fill_ref = store.read(&fill_name)?;
        region = primary_raster.region().union(&fill_ref.region());
        let out = patch::patch(&primary_raster, fill_ref, opts.hole_value, &region);
        trace.push((Stage::Patched, region));

        // Rescan the original holes for cells the fill could not reach.
        let primary_region = primary_raster.region();
        let mut residual_holes = 0usize;
        for row in 0..primary_region.rows() {
            for col in 0..primary_region.cols() {
                if primary_raster.get(row, col) == Some(opts.hole_value) {
                    let (x, y) = primary_region.cell_center(row, col);
                    if out.value_at(x, y).is_none() {
                        residual_holes += 1;
                    }
                }
            }
        }
        let cells_filled = holes_detected - residual_holes;

        store.write(output, out);
        trace.push((Stage::Done, region));

        if residual_holes > 0 {
            warn!(
                "filled {cells_filled} of {holes_detected} hole cells, \
                 {residual_holes} had no reachable support"
            );
        } else {
            info!("filled all {holes_detected} hole cells of '{primary}' into '{output}'");
        }

        Ok(FillReport {
            holes_detected,
            ring_cells,
            samples_drawn,
            cells_filled,
            residual_holes,
            short_circuited: false,
            trace,
        })
    }
}
