//! Command-line interface for turning clist cluster files into NPY images.
#![allow(clippy::uninlined_format_args, clippy::float_cmp)]

use clap::{Parser, Subcommand};
use clusterpix_clist::DEFAULT_PIXEL_COLUMN;
use clusterpix_core::{EnergyRange, ImageSize};
use clusterpix_io::{load_npy, EnergyRangeScanner, FileProcessor, RunConfig};
use log::{info, LevelFilter};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    ClusterpixIo(#[from] clusterpix_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] clusterpix_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convert detector cluster lists into centered, energy-normalized images.
#[derive(Parser)]
#[command(name = "clusterpix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the global energy range of one or more clist files
    Scan {
        /// Input clist file(s)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Name of the cluster-pixel column
        #[arg(long, default_value = DEFAULT_PIXEL_COLUMN)]
        column: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Image every row of a clist file into image_<row>.npy files
    Process {
        /// Input clist file
        input: PathBuf,

        /// Output directory (created if absent)
        #[arg(short, long)]
        output: PathBuf,

        /// Lower energy bound (requires --e-max)
        #[arg(long, requires = "e_max", allow_negative_numbers = true)]
        e_min: Option<f64>,

        /// Upper energy bound (requires --e-min)
        #[arg(long, requires = "e_min", allow_negative_numbers = true)]
        e_max: Option<f64>,

        /// Scan these files for the energy range instead of the input itself
        #[arg(long, num_args = 1.., conflicts_with_all = ["e_min", "e_max"])]
        range_from: Vec<PathBuf>,

        /// Image width (pixels)
        #[arg(long, default_value = "256")]
        width: usize,

        /// Image height (pixels)
        #[arg(long, default_value = "256")]
        height: usize,

        /// Only process the first N rows
        #[arg(long)]
        max_rows: Option<usize>,

        /// Name of the cluster-pixel column
        #[arg(long, default_value = DEFAULT_PIXEL_COLUMN)]
        column: String,
    },

    /// Execute a JSON run configuration (one range scan, then every dataset)
    Run {
        /// Run configuration file
        config: PathBuf,
    },

    /// Summarize an image artifact
    Inspect {
        /// NPY artifact
        artifact: PathBuf,

        /// Also print the cell values
        #[arg(long)]
        grid: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scan {
            files,
            column,
            json,
        } => {
            let scan = EnergyRangeScanner::new()
                .with_column(column)
                .scan(files.as_slice())?;

            if json {
                let value = serde_json::json!({
                    "e_min": scan.range.min(),
                    "e_max": scan.range.max(),
                    "files": scan.files,
                    "rows": scan.rows,
                    "hits": scan.hits,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("E_min: {}", scan.range.min());
                println!("E_max: {}", scan.range.max());
                println!(
                    "Scanned {} file(s), {} rows, {} hits",
                    scan.files, scan.rows, scan.hits
                );
            }
        }

        Commands::Process {
            input,
            output,
            e_min,
            e_max,
            range_from,
            width,
            height,
            max_rows,
            column,
        } => {
            let image_size = ImageSize::new(width, height)?;

            let range = match (e_min, e_max) {
                (Some(min), Some(max)) => EnergyRange::new(min, max)?,
                _ => {
                    let sources = if range_from.is_empty() {
                        vec![input.clone()]
                    } else {
                        range_from
                    };
                    EnergyRangeScanner::new()
                        .with_column(column.clone())
                        .scan(sources.as_slice())?
                        .range
                }
            };
            info!("Energy range: [{}, {}]", range.min(), range.max());

            let start = Instant::now();
            let summary = FileProcessor::new(image_size)
                .with_max_rows(max_rows)
                .with_column(column)
                .process_file(&input, &output, range)?;

            println!(
                "Wrote {} images to {} in {:.2}s",
                summary.rows,
                output.display(),
                start.elapsed().as_secs_f64()
            );
            println!("Total hits: {}", summary.hits);
        }

        Commands::Run { config } => {
            let config = RunConfig::load(&config)?;
            let start = Instant::now();
            let summary = config.run()?;

            println!(
                "Energy range: [{}, {}]",
                summary.range.min(),
                summary.range.max()
            );
            for (dataset, result) in config.datasets.iter().zip(&summary.datasets) {
                println!(
                    "{} -> {}: {} images, {} hits",
                    dataset.input.display(),
                    dataset.output.display(),
                    result.rows,
                    result.hits
                );
            }
            println!(
                "Processed {} dataset(s) in {:.2}s",
                summary.datasets.len(),
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Inspect { artifact, grid } => {
            let image = load_npy(&artifact)?;
            let (width, height) = image.dim();
            let nonzero = image.iter().filter(|&&v| v != 0.0).count();
            let min = image.iter().copied().fold(f64::INFINITY, f64::min);
            let max = image.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            println!("File: {}", artifact.display());
            println!("Shape: {} x {}", width, height);
            println!("Non-zero cells: {}", nonzero);
            println!("Value range: {} - {}", min, max);
            println!("Sum: {}", image.sum());

            if grid {
                for row in image.rows() {
                    let line: Vec<String> = row.iter().map(|v| format!("{:.3}", v)).collect();
                    println!("{}", line.join(" "));
                }
            }
        }
    }

    Ok(())
}
