//! Random point sampling of the auxiliary raster.

use rand::Rng;
use tracing::debug;

use crate::error::{FillError, Result};
use crate::raster::Raster;
use crate::region::Region;

/// A single point sample: a cell-center location and its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Horizontal map coordinate of the sampled cell center.
    pub x: f64,
    /// Vertical map coordinate of the sampled cell center.
    pub y: f64,
    /// Sampled value.
    pub value: f64,
}

/// A sparse set of point samples drawn from one raster.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the set holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate over the samples.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }
}

/// Draw a uniform random sample of `percentage` percent of the valid cells
/// of `source` within `region`, without replacement.
///
/// The draw count is `round(percentage/100 × valid-cell-count)`. Sampling is
/// not seeded here; callers that need reproducibility pass a seeded rng.
///
/// # Errors
///
/// - [`FillError::InvalidPercentage`] if `percentage > 100`.
/// - [`FillError::NoAuxiliaryData`] if `source` has no valid cells inside
///   `region`; an empty support set would leave the interpolator nothing to
///   work from, so this fails fast instead.
pub fn sample<R: Rng + ?Sized>(
    source: &Raster,
    region: &Region,
    percentage: u8,
    rng: &mut R,
) -> Result<SampleSet> {
    if percentage > 100 {
        return Err(FillError::InvalidPercentage { value: percentage });
    }

    let mut valid = Vec::new();
    for row in 0..region.rows() {
        for col in 0..region.cols() {
            let (x, y) = region.cell_center(row, col);
            if let Some(value) = source.value_at(x, y) {
                valid.push(Sample { x, y, value });
            }
        }
    }

    if valid.is_empty() {
        return Err(FillError::NoAuxiliaryData {
            rows: region.rows(),
            cols: region.cols(),
        });
    }

    let count = (percentage as f64 / 100.0 * valid.len() as f64).round() as usize;
    let samples = rand::seq::index::sample(rng, valid.len(), count)
        .iter()
        .map(|i| valid[i])
        .collect();

    debug!(
        "sampled {count} of {} valid auxiliary cells ({percentage}%)",
        valid.len()
    );
    Ok(SampleSet { samples })
}
