use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Gap-free elevation tiles from a holed primary and an auxiliary source
#[derive(Parser)]
#[command(name = "gapfill")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose logging (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill data holes in a primary tile using an auxiliary tile
    Fill {
        /// Primary .hgt tile (the one with holes)
        primary: PathBuf,

        /// Auxiliary .hgt tile covering the same area
        auxiliary: PathBuf,

        /// Output .hgt path
        #[arg(short, long)]
        output: PathBuf,

        /// Numeric value marking data holes in the primary tile
        #[arg(
            long,
            env = "GAPFILL_HOLE_VALUE",
            default_value = "-9999",
            allow_negative_numbers = true
        )]
        hole_value: f64,

        /// Percentage of valid auxiliary cells to sample (0-100)
        #[arg(
            short = 'p',
            long,
            env = "GAPFILL_SAMPLE_PERCENTAGE",
            default_value = "30"
        )]
        percentage: u8,

        /// Buffer distance around holes, in meters
        #[arg(short = 'd', long, env = "GAPFILL_BUFFER_DISTANCE", default_value = "60")]
        distance: f64,

        /// Interpolation method: bilinear or spline
        #[arg(short, long, default_value = "bilinear")]
        method: String,

        /// Output the fill report as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Display information about a .hgt tile
    Info {
        /// Path to the .hgt (or .hgt.zip) tile
        tile: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Fill {
            primary,
            auxiliary,
            output,
            hole_value,
            percentage,
            distance,
            method,
            json,
        } => commands::fill::run(
            primary, auxiliary, output, hole_value, percentage, distance, method, json,
        ),
        Commands::Info { tile } => commands::info::run(tile),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .init();
}
