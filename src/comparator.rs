//! Reference comparison driver
//!
//! `Comparator` runs one sequential pass over the reference tree: every file is
//! checked for a counterpart, image pairs are measured against the threshold,
//! and failing pairs optionally get a composed diff image. Report lines go to
//! the writer given to [`Comparator::run`]; diagnostics go through `tracing`.

use crate::{
    backends::{create_backend, ImageDiffBackend},
    config::CompareConfig,
    error::{CompareError, Result},
    services::{CompareSummary, ComparisonTask, Outcome, ReferenceWalker, TextDiffer},
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};

/// Compares a reference tree against a render tree
pub struct Comparator {
    config: CompareConfig,
    backend: Box<dyn ImageDiffBackend>,
    image_pattern: glob::Pattern,
    text_differ: Option<TextDiffer>,
}

impl Comparator {
    /// Create a comparator with the backend named by the configuration
    ///
    /// # Errors
    ///
    /// Returns `CompareError::InvalidConfig` when the image pattern is not a
    /// valid glob.
    pub fn new(config: CompareConfig) -> Result<Self> {
        let backend = create_backend(&config);
        Self::with_backend(config, backend)
    }

    /// Create a comparator with a custom backend
    ///
    /// # Errors
    ///
    /// Returns `CompareError::InvalidConfig` when the image pattern is not a
    /// valid glob.
    pub fn with_backend(config: CompareConfig, backend: Box<dyn ImageDiffBackend>) -> Result<Self> {
        let image_pattern = glob::Pattern::new(&config.image_pattern).map_err(|e| {
            CompareError::invalid_config(format!(
                "Invalid image pattern '{}': {}",
                config.image_pattern, e
            ))
        })?;
        let text_differ = config
            .text_diff
            .then(|| TextDiffer::new(config.programs.diff.clone()));

        Ok(Self {
            config,
            backend,
            image_pattern,
            text_differ,
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Whether a task's file name selects it for pixel comparison
    #[must_use]
    pub fn is_image(&self, task: &ComparisonTask) -> bool {
        task.file_name()
            .is_some_and(|name| self.image_pattern.matches(&name.to_string_lossy()))
    }

    /// Walk the reference tree and write one line per reported file to `out`
    ///
    /// # Errors
    ///
    /// Stops at the first error: an unreadable directory, a comparison tool that
    /// fails or prints no metric, a diff image that cannot be written, or a
    /// failed write to `out`.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<CompareSummary> {
        self.config.validate_directories()?;

        let _span = info_span!(
            "compare",
            reference = %self.config.reference_dir.display(),
            render = %self.config.render_dir.display()
        )
        .entered();
        info!(
            backend = self.backend.name(),
            threshold = self.config.threshold,
            "Comparing reference tree"
        );

        let walker = ReferenceWalker::new(&self.config.reference_dir, &self.config.render_dir);
        let mut summary = CompareSummary::default();

        for task in walker.tasks() {
            let task = task?;
            let outcome = self.compare_task(&task)?;
            summary.record(&outcome);

            if let Some(line) = outcome.report_line() {
                writeln!(out, "{line}")?;
            }
        }
        out.flush()?;

        info!(
            files = summary.files_checked,
            images = summary.images_compared,
            missing = summary.missing,
            mismatched = summary.mismatched,
            diffs = summary.diffs_written,
            "Comparison finished"
        );
        Ok(summary)
    }

    /// Check a single reference file against its counterpart
    ///
    /// # Errors
    ///
    /// Propagates backend and text diff failures, and failures creating the
    /// diff directory.
    pub fn compare_task(&self, task: &ComparisonTask) -> Result<Outcome> {
        if !task.counterpart_exists() {
            debug!(generated = %task.generated.display(), "Counterpart missing");
            return Ok(Outcome::Missing {
                generated: task.generated.clone(),
            });
        }

        if self.is_image(task) {
            return self.compare_images(task);
        }

        if let Some(differ) = &self.text_differ {
            let excluded = task.file_name().is_some_and(TextDiffer::is_excluded);
            if !excluded {
                if let Some(output) = differ.diff(&task.reference, &task.generated)? {
                    return Ok(Outcome::TextDiffers { output });
                }
            }
        }

        Ok(Outcome::Skipped)
    }

    fn compare_images(&self, task: &ComparisonTask) -> Result<Outcome> {
        let metric = self.backend.measure(&task.reference, &task.generated)?;
        debug!(
            reference = %task.relative.display(),
            mse = metric.value,
            "Measured image pair"
        );

        if !metric.exceeds(self.config.threshold) {
            return Ok(Outcome::Passed { metric });
        }

        let diff_image = match &self.config.diff_dir {
            Some(diff_dir) => Some(self.write_diff_image(task, diff_dir)?),
            None => None,
        };

        Ok(Outcome::Mismatch {
            reference: task.reference.clone(),
            metric,
            diff_image,
        })
    }

    fn write_diff_image(&self, task: &ComparisonTask, diff_dir: &Path) -> Result<PathBuf> {
        if !diff_dir.exists() {
            std::fs::create_dir_all(diff_dir)
                .map_err(|e| CompareError::file_io_error("create diff directory", diff_dir, e))?;
        }

        let output = diff_dir.join(task.diff_file_name());
        if output.exists() {
            warn!(output = %output.display(), "Overwriting existing diff image");
        }
        self.backend
            .render_diff(&task.reference, &task.generated, &output)?;
        Ok(output)
    }
}
