//! Error types for reference comparison runs

use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;

/// Result type alias for comparison operations
pub type Result<T> = std::result::Result<T, CompareError>;

/// Errors that terminate a comparison run
///
/// Missing counterparts and metrics above the threshold are not errors; they are
/// reported as [`crate::Outcome`] values and the run continues.
#[derive(Error, Debug)]
pub enum CompareError {
    /// Input/output errors (permission denied, unreadable file, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal errors
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Image decode or encode errors (native backend)
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// An external program could not be started
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An external program exited with an unexpected status
    #[error("'{program}' failed ({status}): {output}")]
    ToolFailed {
        program: String,
        status: ExitStatus,
        output: String,
    },

    /// The comparison output did not carry a parenthesized metric
    #[error("Could not extract metric from comparison output: {output:?}")]
    MetricParse { output: String },

    /// The two images of a pair have different dimensions
    #[error(
        "Image sizes differ for {}: reference {}x{}, generated {}x{}",
        .path.display(),
        .reference.0,
        .reference.1,
        .generated.0,
        .generated.1
    )]
    ImageSizeMismatch {
        path: PathBuf,
        reference: (u32, u32),
        generated: (u32, u32),
    },

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CompareError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a spawn error for the given program
    pub fn spawn<S: Into<String>>(program: S, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Create a tool failure error, keeping the combined output for diagnostics
    pub fn tool_failed<S: Into<String>>(program: S, status: ExitStatus, output: String) -> Self {
        Self::ToolFailed {
            program: program.into(),
            status,
            output: output.trim().to_string(),
        }
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<Path>>(operation: &str, path: P, error: std::io::Error) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }
}
