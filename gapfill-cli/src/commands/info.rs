use anyhow::{Context, Result};
use gapfill::filename::tile_filename;
use gapfill::{HgtResolution, HgtTile};
use std::path::PathBuf;

pub fn run(tile: PathBuf) -> Result<()> {
    let file_size = std::fs::metadata(&tile)
        .with_context(|| format!("cannot stat {}", tile.display()))?
        .len();

    let loaded =
        HgtTile::open(&tile).with_context(|| format!("failed to read {}", tile.display()))?;
    let raster = loaded.raster();

    let total = raster.rows() * raster.cols();
    let valid = raster.valid_count();
    let voids = total - valid;

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for row in 0..raster.rows() {
        for col in 0..raster.cols() {
            if let Some(v) = raster.get(row, col) {
                min = min.min(v);
                max = max.max(v);
            }
        }
    }

    let resolution = match loaded.resolution() {
        HgtResolution::OneArcSecond => "1 arc-second (~30m)",
        HgtResolution::ThreeArcSecond => "3 arc-second (~90m)",
    };
    let cell = loaded.ground_cell_size();

    println!("Tile: {}", tile.display());
    println!(
        "  Canonical name:   {}",
        tile_filename(loaded.base_lat() as f64, loaded.base_lon() as f64)
    );
    println!("  Southwest corner: {}, {}", loaded.base_lat(), loaded.base_lon());
    println!("  Resolution:       {}", resolution);
    println!("  Grid:             {} x {}", raster.rows(), raster.cols());
    println!("  Cell size:        {:.1} m x {:.1} m", cell.ew, cell.ns);
    println!("  File size:        {} bytes", file_size);
    if valid > 0 {
        println!("  Elevation range:  {:.0} m to {:.0} m", min, max);
    } else {
        println!("  Elevation range:  (no valid cells)");
    }
    println!(
        "  Voids:            {} of {} cells ({:.2}%)",
        voids,
        total,
        voids as f64 / total as f64 * 100.0
    );

    Ok(())
}
