//! Configuration types for comparison runs

use crate::error::{CompareError, Result};
use std::path::{Path, PathBuf};

/// Largest accepted mean-squared-error before a pair is reported
pub const DEFAULT_THRESHOLD: f64 = 0.001;

/// File name pattern selecting the files that get a pixel comparison
pub const DEFAULT_IMAGE_PATTERN: &str = "*.png";

/// Files never handed to the textual diff
pub const TEXT_DIFF_EXCLUDED: &[&str] = &["manifest.json"];

/// Backend used to measure and visualize image differences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendType {
    /// ImageMagick `compare` and `montage` executables
    #[default]
    ImageMagick,
    /// Pure Rust implementation on top of the `image` crate
    Native,
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ImageMagick => write!(f, "imagemagick"),
            Self::Native => write!(f, "native"),
        }
    }
}

/// Names of the external programs invoked during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPrograms {
    /// Pixel comparison program (`compare`)
    pub compare: String,
    /// Image composition program (`montage`)
    pub montage: String,
    /// Text diff program (`diff`)
    pub diff: String,
}

impl Default for ToolPrograms {
    fn default() -> Self {
        Self {
            compare: "compare".to_string(),
            montage: "montage".to_string(),
            diff: "diff".to_string(),
        }
    }
}

/// Configuration for a single comparison run
#[derive(Debug, Clone)]
pub struct CompareConfig {
    /// Root of the reference (expected) tree
    pub reference_dir: PathBuf,
    /// Root of the generated tree, mirrored path-for-path against the reference
    pub render_dir: PathBuf,
    /// Where composed diff images go; `None` disables diff generation
    pub diff_dir: Option<PathBuf>,
    /// Metrics strictly above this value are reported
    pub threshold: f64,
    /// Glob matched against file names to select image pairs
    pub image_pattern: String,
    /// Backend used for image pairs
    pub backend_type: BackendType,
    /// External program names
    pub programs: ToolPrograms,
    /// Run a whitespace-insensitive text diff on non-image files
    pub text_diff: bool,
}

impl CompareConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> CompareConfigBuilder {
        CompareConfigBuilder::new()
    }

    /// Check that the directories named by this configuration are usable
    ///
    /// # Errors
    ///
    /// Returns `CompareError::InvalidConfig` when the reference root is not a
    /// directory or when the diff path exists but is a regular file.
    pub fn validate_directories(&self) -> Result<()> {
        if !self.reference_dir.is_dir() {
            return Err(CompareError::invalid_config(format!(
                "Reference directory does not exist or is not a directory: {}",
                self.reference_dir.display()
            )));
        }
        if let Some(diff_dir) = &self.diff_dir {
            if diff_dir.is_file() {
                return Err(CompareError::invalid_config(format!(
                    "Diff output path exists and is a file, not a directory: {}",
                    diff_dir.display()
                )));
            }
        }
        Ok(())
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            reference_dir: PathBuf::from("."),
            render_dir: PathBuf::from("."),
            diff_dir: None,
            threshold: DEFAULT_THRESHOLD,
            image_pattern: DEFAULT_IMAGE_PATTERN.to_string(),
            backend_type: BackendType::default(),
            programs: ToolPrograms::default(),
            text_diff: false,
        }
    }
}

/// Builder for `CompareConfig`
pub struct CompareConfigBuilder {
    config: CompareConfig,
}

impl CompareConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: CompareConfig::default(),
        }
    }

    #[must_use]
    pub fn reference_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.config.reference_dir = dir.as_ref().to_path_buf();
        self
    }

    #[must_use]
    pub fn render_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.config.render_dir = dir.as_ref().to_path_buf();
        self
    }

    #[must_use]
    pub fn diff_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config.diff_dir = dir;
        self
    }

    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    #[must_use]
    pub fn image_pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.config.image_pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn backend_type(mut self, backend_type: BackendType) -> Self {
        self.config.backend_type = backend_type;
        self
    }

    #[must_use]
    pub fn compare_program<S: Into<String>>(mut self, program: S) -> Self {
        self.config.programs.compare = program.into();
        self
    }

    #[must_use]
    pub fn montage_program<S: Into<String>>(mut self, program: S) -> Self {
        self.config.programs.montage = program.into();
        self
    }

    #[must_use]
    pub fn diff_program<S: Into<String>>(mut self, program: S) -> Self {
        self.config.programs.diff = program.into();
        self
    }

    #[must_use]
    pub fn text_diff(mut self, enabled: bool) -> Self {
        self.config.text_diff = enabled;
        self
    }

    /// Build the comparison configuration
    ///
    /// # Errors
    ///
    /// Returns `CompareError::InvalidConfig` for:
    /// - A negative, NaN or infinite threshold
    /// - An image pattern that is not a valid glob
    /// - Empty program names
    pub fn build(self) -> Result<CompareConfig> {
        let threshold = self.config.threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(CompareError::invalid_config(format!(
                "Threshold must be a finite, non-negative number (got {threshold})"
            )));
        }

        glob::Pattern::new(&self.config.image_pattern).map_err(|e| {
            CompareError::invalid_config(format!(
                "Invalid image pattern '{}': {}",
                self.config.image_pattern, e
            ))
        })?;

        let programs = &self.config.programs;
        if programs.compare.is_empty() || programs.montage.is_empty() || programs.diff.is_empty() {
            return Err(CompareError::invalid_config("Program names must not be empty"));
        }

        Ok(self.config)
    }
}

impl Default for CompareConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
