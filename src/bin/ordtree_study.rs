//! Times the red-black tree against the unbalanced baseline and writes the results as CSV.
//!
//! Usage: `ordtree-study [OUTPUT]`, OUTPUT defaulting to `target/bench/results.csv`.
//! `ORDTREE_SIZES` (comma separated) overrides the sizes measured and `ORDTREE_LOG` sets the log
//! level.

use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::str::FromStr;

use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use ordtree::study::{self, StudyConfig};

const DEFAULT_OUTPUT: &str = "target/bench/results.csv";

fn initialize_logging() -> Result<(), Box<dyn Error>> {
    let level = std::env::var("ORDTREE_LOG")
        .ok()
        .and_then(|level| LevelFilter::from_str(&level).ok())
        .unwrap_or(LevelFilter::Info);
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    initialize_logging()?;

    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let mut config = StudyConfig::default();
    if let Ok(sizes) = std::env::var("ORDTREE_SIZES") {
        config.sizes = StudyConfig::parse_sizes(&sizes)?;
    }

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let out = BufWriter::new(File::create(&output)?);

    info!(
        "running study over {} sizes, {} repetitions after {} warmup rounds",
        config.sizes.len(),
        config.repetitions,
        config.warmup
    );
    let rows = study::run(&config, out)?;
    info!("wrote {} rows to {}", rows.len(), output.display());
    Ok(())
}
