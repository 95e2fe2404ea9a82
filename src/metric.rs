//! Extraction of the mean-squared-error metric from comparison tool output

use crate::error::{CompareError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// `compare -metric mse` prints `<absolute> (<normalized>)`; the value in
/// parentheses is the one compared against the threshold.
const METRIC_PATTERN: &str = r"([^(]+)\(([^)]+)";

fn metric_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(METRIC_PATTERN).expect("metric pattern is a valid regex"))
}

/// Dissimilarity between a reference image and its generated counterpart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricResult {
    /// Normalized mean squared error, `0.0` for identical images
    pub value: f64,
}

impl MetricResult {
    /// Metric of two images the comparison tool reported as identical
    #[must_use]
    pub fn identical() -> Self {
        Self { value: 0.0 }
    }

    #[must_use]
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    /// Whether this metric fails the given threshold
    #[must_use]
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.value > threshold
    }
}

impl std::fmt::Display for MetricResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Parse the parenthesized metric out of the combined output of a comparison
///
/// # Errors
///
/// Returns `CompareError::MetricParse` when the text has no parenthesized
/// value, or when the captured value is not a floating-point number.
pub fn parse_metric(output: &str) -> Result<MetricResult> {
    let value = metric_regex()
        .captures(output)
        .and_then(|caps| caps.get(2))
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .ok_or_else(|| CompareError::MetricParse {
            output: output.to_string(),
        })?;

    Ok(MetricResult::new(value))
}
