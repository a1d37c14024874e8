//! Minimal example: fill a synthetic holed raster from a synthetic auxiliary.
//!
//! Run with: cargo run --example fill_synthetic

use gapfill::{FillError, FillOptions, Raster, RasterStore, Region, VoidFillPipeline};

fn main() -> Result<(), FillError> {
    let region = Region::from_grid(0.0, 600.0, 20, 20, 30.0, 30.0)?;

    // Primary: a ridge with a 4x4 block of holes.
    let mut primary = Raster::absent(region);
    for row in 0..20 {
        for col in 0..20 {
            primary.set(row, col, 300.0 + (row as f64 - 10.0).abs() * -8.0 + col as f64);
        }
    }
    for row in 8..12 {
        for col in 8..12 {
            primary.set(row, col, -9999.0);
        }
    }

    // Auxiliary: a coarser take on the same terrain, fully valid.
    let mut auxiliary = Raster::absent(region);
    for row in 0..20 {
        for col in 0..20 {
            auxiliary.set(row, col, 295.0 + (row as f64 - 10.0).abs() * -8.0 + col as f64);
        }
    }

    let mut store = RasterStore::new();
    store.write("primary", primary);
    store.write("auxiliary", auxiliary);

    let pipeline = VoidFillPipeline::new(FillOptions::default().sample_percentage(40));
    let report = pipeline.run(&mut store, "primary", "auxiliary", "filled")?;

    println!("holes detected: {}", report.holes_detected);
    println!("ring cells:     {}", report.ring_cells);
    println!("samples drawn:  {}", report.samples_drawn);
    println!("cells filled:   {}", report.cells_filled);
    println!("residual holes: {}", report.residual_holes);

    let filled = store.read("filled")?;
    println!("\nfilled block:");
    for row in 8..12 {
        let line: Vec<String> = (8..12)
            .map(|col| match filled.get(row, col) {
                Some(v) => format!("{v:7.1}"),
                None => "      -".to_string(),
            })
            .collect();
        println!("  {}", line.join(" "));
    }

    Ok(())
}
