//! Reference render comparison CLI
//!
//! Command-line interface comparing a reference image tree against a generated one.

use super::config::CliConfigBuilder;
use crate::comparator::Comparator;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Compare reference PNG renders against generated renders
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "refpng-compare")]
pub struct Cli {
    /// Path of the reference directory
    #[arg(value_name = "REF_DIR")]
    pub ref_dir: PathBuf,

    /// Path of the generated directory
    #[arg(value_name = "RENDER_DIR")]
    pub render_dir: PathBuf,

    /// Write a reference | difference | generated image for each failing file into DIR
    #[arg(short, long, value_name = "DIR")]
    pub diff_dir: Option<PathBuf>,

    /// Report images whose mean squared error is above this value
    #[arg(short, long, default_value_t = crate::config::DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Pattern selecting the files that get a pixel comparison
    #[arg(long, default_value = crate::config::DEFAULT_IMAGE_PATTERN)]
    pub pattern: String,

    /// Comparison backend
    #[arg(short, long, value_enum, default_value_t = CliBackend::Imagemagick)]
    pub backend: CliBackend,

    /// ImageMagick compare executable
    #[arg(long, value_name = "PROGRAM", default_value = "compare")]
    pub compare_bin: String,

    /// ImageMagick montage executable
    #[arg(long, value_name = "PROGRAM", default_value = "montage")]
    pub montage_bin: String,

    /// Also diff non-image files as text, ignoring whitespace (manifest.json is skipped)
    #[arg(long)]
    pub text_diff: bool,

    /// Text diff executable
    #[arg(long, value_name = "PROGRAM", default_value = "diff")]
    pub diff_bin: String,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = CliLogFormat::Console)]
    pub log_format: CliLogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliBackend {
    /// ImageMagick compare and montage
    Imagemagick,
    /// Built-in comparison, no external tools
    Native,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliLogFormat {
    Console,
    Compact,
    #[cfg(feature = "tracing-json")]
    Json,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_format).context("Failed to initialize tracing")?;

    // Validate CLI arguments
    CliConfigBuilder::validate_cli(&cli).context("Invalid CLI arguments")?;

    // Convert CLI arguments to comparison configuration
    let config = CliConfigBuilder::from_cli(&cli).context("Failed to build configuration")?;

    info!("Reference: {}", config.reference_dir.display());
    info!("Render: {}", config.render_dir.display());
    if let Some(diff_dir) = &config.diff_dir {
        info!("Diff images: {}", diff_dir.display());
    }

    let comparator = Comparator::new(config).context("Failed to create comparator")?;

    let start_time = Instant::now();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = comparator
        .run(&mut out)
        .context("Comparison aborted")?;
    out.flush().context("Failed to flush report")?;

    if summary.has_failures() {
        info!(
            "Checked {} file(s) in {:.2}s: {} missing, {} above threshold, {} text difference(s)",
            summary.files_checked,
            start_time.elapsed().as_secs_f64(),
            summary.missing,
            summary.mismatched,
            summary.text_differences
        );
    } else {
        info!(
            "Checked {} file(s) in {:.2}s: all match the reference",
            summary.files_checked,
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

/// Initialize tracing based on verbosity level
fn init_tracing(verbose_count: u8, log_format: CliLogFormat) -> Result<()> {
    use crate::tracing_config::{TracingConfig, TracingFormat};

    let format = match log_format {
        CliLogFormat::Console => TracingFormat::Console,
        CliLogFormat::Compact => TracingFormat::Compact,
        #[cfg(feature = "tracing-json")]
        CliLogFormat::Json => TracingFormat::Json,
    };

    TracingConfig::new()
        .with_verbosity(verbose_count)
        .with_format(format)
        .with_env_filter_from_env()
        .init()
        .context("Failed to initialize tracing subscriber")?;

    debug!(verbosity = verbose_count, "Tracing initialized");
    Ok(())
}
