//! Backend implementations for measuring image differences
//!
//! This module provides two backends for pixel comparison:
//! - ImageMagick backend (external `compare` and `montage` executables)
//! - Native backend (pure Rust, no external dependencies)

pub mod imagemagick;
pub mod native;

pub use self::imagemagick::ImageMagickBackend;
pub use self::native::NativeBackend;

use crate::{
    config::{BackendType, CompareConfig},
    error::Result,
    metric::MetricResult,
};
use std::path::Path;

/// Trait for image comparison backends
pub trait ImageDiffBackend {
    /// Short backend name used in log output
    fn name(&self) -> &'static str;

    /// Compute the mean-squared-error metric between two images
    ///
    /// # Errors
    /// - Images that cannot be read or decoded
    /// - Comparison failures other than "images differ"
    /// - Output from which no metric can be extracted
    fn measure(&self, reference: &Path, generated: &Path) -> Result<MetricResult>;

    /// Write a reference | difference | generated strip to `output`
    ///
    /// # Errors
    /// - Images that cannot be read or decoded
    /// - Composition or encoding failures
    fn render_diff(&self, reference: &Path, generated: &Path, output: &Path) -> Result<()>;
}

/// Create the backend selected by the configuration
#[must_use]
pub fn create_backend(config: &CompareConfig) -> Box<dyn ImageDiffBackend> {
    match config.backend_type {
        BackendType::ImageMagick => Box::new(ImageMagickBackend::new(
            config.programs.compare.clone(),
            config.programs.montage.clone(),
        )),
        BackendType::Native => Box::new(NativeBackend::new()),
    }
}
