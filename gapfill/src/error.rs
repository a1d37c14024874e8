//! Error types for the gapfill library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while filling elevation data holes.
///
/// Configuration problems (missing rasters, bad parameters, unreadable
/// files) abort a run before anything is written. A missing auxiliary
/// dataset aborts the run but leaves the primary raster untouched.
/// Degenerate inputs that still produce an output (zero holes, residual
/// unfillable cells) are not errors; they are reported through
/// [`FillReport`](crate::pipeline::FillReport).
#[derive(Error, Debug)]
pub enum FillError {
    /// IO error when reading or writing tile files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A named raster is missing from the store.
    #[error("raster not found in store: {name}")]
    RasterNotFound { name: String },

    /// Region bounds or resolution do not describe a usable extent.
    #[error("invalid region: {reason}")]
    InvalidRegion { reason: String },

    /// Raster data length does not match its region.
    #[error("grid mismatch: region has {expected} cells but data has {actual}")]
    GridMismatch { expected: usize, actual: usize },

    /// Sample percentage outside 0-100.
    #[error("invalid sample percentage: {value} (valid: 0-100)")]
    InvalidPercentage { value: u8 },

    /// Negative buffer distance.
    #[error("invalid buffer distance: {value} m (must be >= 0)")]
    InvalidDistance { value: f64 },

    /// The auxiliary raster has no valid cells in the working region, so
    /// there is nothing to sample fill values from.
    #[error("auxiliary raster has no valid cells in the {rows}x{cols} working region")]
    NoAuxiliaryData { rows: usize, cols: usize },

    /// Tile file size doesn't match a known sample layout.
    #[error("invalid file size: {size} bytes (expected 25934402 for 1-arcsec or 2884802 for 3-arcsec)")]
    InvalidFileSize { size: usize },

    /// Tile coordinates could not be parsed from the file name.
    #[error("cannot determine tile coordinates from file name: {path}")]
    BadTileName { path: PathBuf },
}

/// Result type alias using [`FillError`].
pub type Result<T> = std::result::Result<T, FillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FillError::RasterNotFound {
            name: "primary".into(),
        };
        assert!(err.to_string().contains("primary"));

        let err = FillError::InvalidPercentage { value: 130 };
        assert!(err.to_string().contains("130"));

        let err = FillError::NoAuxiliaryData { rows: 10, cols: 12 };
        assert!(err.to_string().contains("10x12"));

        let err = FillError::BadTileName {
            path: PathBuf::from("somewhere.hgt"),
        };
        assert!(err.to_string().contains("somewhere.hgt"));
    }
}
