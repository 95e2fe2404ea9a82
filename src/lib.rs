#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # refpng-compare
//!
//! Compares a tree of reference PNG renders against a tree of generated renders.
//!
//! Every file under the reference directory is expected at the same relative path
//! under the render directory. Missing counterparts are reported; PNG pairs are
//! measured with a mean-squared-error metric and reported when the metric is above
//! the threshold. Failing pairs can additionally be rendered as a
//! reference | difference | generated strip for visual inspection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use refpng_compare::{BackendType, CompareConfig, Comparator};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = CompareConfig::builder()
//!     .reference_dir("reference-files/renders")
//!     .render_dir("build/renders")
//!     .diff_dir(Some("build/diffs".into()))
//!     .backend_type(BackendType::ImageMagick)
//!     .build()?;
//!
//! let comparator = Comparator::new(config)?;
//! let summary = comparator.run(&mut std::io::stdout().lock())?;
//! println!("{} file(s) above threshold", summary.mismatched);
//! # Ok(())
//! # }
//! ```
//!
//! ## Backends
//!
//! - `imagemagick` (default): runs `compare -metric mse` and `montage`
//! - `native`: pure Rust using the `image` crate, no external tools
//!
//! ### Feature Flags
//!
//! - `cli` (default): command-line interface and tracing subscriber setup
//! - `tracing-json`: JSON log output for the CLI

pub mod backends;
#[cfg(feature = "cli")]
pub mod cli;
pub mod comparator;
pub mod config;
pub mod error;
pub mod metric;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;

// Public API exports
pub use backends::{create_backend, ImageDiffBackend, ImageMagickBackend, NativeBackend};
pub use comparator::Comparator;
pub use config::{
    BackendType, CompareConfig, CompareConfigBuilder, ToolPrograms, DEFAULT_IMAGE_PATTERN,
    DEFAULT_THRESHOLD,
};
pub use error::{CompareError, Result};
pub use metric::{parse_metric, MetricResult};
pub use services::{CompareSummary, ComparisonTask, Outcome, ReferenceWalker, TextDiffer};

#[cfg(feature = "cli")]
pub use tracing_config::{TracingConfig, TracingFormat};
