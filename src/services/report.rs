//! Per-file outcomes and run summary

use crate::metric::MetricResult;
use std::path::PathBuf;

/// Result of checking one reference file
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No counterpart under the render root
    Missing { generated: PathBuf },
    /// Image pair within the threshold
    Passed { metric: MetricResult },
    /// Image pair above the threshold
    Mismatch {
        reference: PathBuf,
        metric: MetricResult,
        diff_image: Option<PathBuf>,
    },
    /// Non-image pair whose text differs
    TextDiffers { output: String },
    /// Counterpart exists and no content check applies
    Skipped,
}

impl Outcome {
    /// Line printed to stdout for this outcome, if any
    #[must_use]
    pub fn report_line(&self) -> Option<String> {
        match self {
            Self::Missing { generated } => {
                Some(format!("File {} does not exist", generated.display()))
            },
            Self::Mismatch {
                reference, metric, ..
            } => Some(format!("{}: {}", reference.display(), metric)),
            Self::TextDiffers { output } => Some(output.trim_end().to_string()),
            Self::Passed { .. } | Self::Skipped => None,
        }
    }
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareSummary {
    pub files_checked: usize,
    pub images_compared: usize,
    pub missing: usize,
    pub mismatched: usize,
    pub text_differences: usize,
    pub diffs_written: usize,
}

impl CompareSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        self.files_checked += 1;
        match outcome {
            Outcome::Missing { .. } => self.missing += 1,
            Outcome::Passed { .. } => self.images_compared += 1,
            Outcome::Mismatch { diff_image, .. } => {
                self.images_compared += 1;
                self.mismatched += 1;
                if diff_image.is_some() {
                    self.diffs_written += 1;
                }
            },
            Outcome::TextDiffers { .. } => self.text_differences += 1,
            Outcome::Skipped => {},
        }
    }

    /// Whether anything was reported during the run
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.missing + self.mismatched + self.text_differences > 0
    }
}
