//!
//! Command-line interface for the polarpix event pipelines.
#![allow(clippy::uninlined_format_args, clippy::cast_precision_loss)]

use clap::{Parser, Subcommand, ValueEnum};

use polarpix_core::CalibrationConfig;
use polarpix_evt::{read_file, EventFile, GTI_EXTENSION};
use polarpix_io::{filter_to_file, split_observation, FilterMode, UnitData};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event file error: {0}")]
    Evt(#[from] polarpix_evt::Error),

    #[error("Core error: {0}")]
    Core(#[from] polarpix_core::Error),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] polarpix_io::Error),

    #[error("{failed} of {total} detector units failed")]
    UnitsFailed { failed: usize, total: usize },
}

/// Filter output selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Keep only source-like events
    Rej,
    /// Keep only background-like events
    Bkg,
    /// Keep every event, append a 0/1 source tag column
    Tag,
}

impl From<Mode> for FilterMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Rej => FilterMode::Rej,
            Mode::Bkg => FilterMode::Bkg,
            Mode::Tag => FilterMode::Tag,
        }
    }
}

/// X-ray polarimetry event filtering and splitting.
#[derive(Parser)]
#[command(name = "polarpix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a level-2 file against its level-1 track descriptors
    Filter {
        /// Level-2 event file
        level2: PathBuf,

        /// Level-1 event file(s) of the same detector unit
        #[arg(required = true)]
        level1: Vec<PathBuf>,

        /// What the output contains
        #[arg(short, long, value_enum, default_value = "rej")]
        mode: Mode,

        /// Calibration override file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Split every detector unit of an observation on a common time grid
    Split {
        /// Observation root containing event_l1/ and event_l2/
        #[arg(short, long)]
        path: PathBuf,

        /// Bin duration (seconds)
        #[arg(short, long)]
        duration: f64,

        /// Calibration override file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show information about an event file
    Info {
        /// Input event file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Filter {
            level2,
            level1,
            mode,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let start = Instant::now();

            let unit = UnitData::load_pair(&level2, &level1)?;
            let (path, stats) = filter_to_file(&unit, &config, mode.into())?;
            let elapsed = start.elapsed();

            println!("Input events: {}", stats.n_input);
            println!("Joined events: {}", stats.n_joined);
            println!("Source-like: {}", stats.n_source);
            println!(
                "Wrote {} events to {} in {:.2}s",
                stats.n_output,
                path.display(),
                elapsed.as_secs_f64()
            );
        }

        Commands::Split {
            path,
            duration,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let start = Instant::now();

            let report = split_observation(&path, duration, &config)?;
            let elapsed = start.elapsed();

            println!(
                "Grid: {} bins of {:.3}s over [{}, {}]",
                report.grid.n_bins(),
                report.grid.bin_width(),
                report.grid.start(),
                report.grid.stop()
            );
            let total = report.units.len();
            let mut failed = 0usize;
            for (du, outcome) in &report.units {
                match outcome {
                    Ok(unit) => println!(
                        "DU {}: {} files, {:.3}s live",
                        du,
                        unit.paths.len(),
                        unit.livetime
                    ),
                    Err(err) => {
                        failed += 1;
                        eprintln!("DU {}: {}", du, err);
                    }
                }
            }
            println!("Split {} unit(s) in {:.2}s", total, elapsed.as_secs_f64());
            if failed > 0 {
                return Err(CliError::UnitsFailed { failed, total });
            }
        }

        Commands::Info { input } => {
            let file = read_file(&input)?;
            print_info(&input, &file)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<CalibrationConfig> {
    match path {
        Some(path) => Ok(CalibrationConfig::from_file(path)?),
        None => Ok(CalibrationConfig::gpd_defaults()),
    }
}

fn print_info(path: &Path, file: &EventFile) -> Result<()> {
    println!("File: {}", path.display());
    let size = std::fs::metadata(path)?.len();
    println!("Size: {} bytes ({:.2} MB)", size, size as f64 / 1_000_000.0);

    println!("Primary header:");
    for (key, value) in file.primary.iter() {
        println!("  {} = {}", key, value);
    }

    for extension in &file.extensions {
        println!(
            "Extension {}: {} rows, {} columns",
            extension.name,
            extension.table.n_rows(),
            extension.table.n_columns()
        );
        for column in extension.table.columns() {
            println!("  {} ({})", column.name, column.data.dtype().name());
        }
    }

    if file.has_extension(GTI_EXTENSION) {
        let gti = file.gti_list()?;
        println!(
            "GTI: {} interval(s), {:.3}s exposure",
            gti.len(),
            gti.exposure()
        );
    }
    if let Some(livetime) = file.livetime() {
        println!("Livetime: {:.3}s", livetime);
    }
    Ok(())
}
