//! Whitespace-insensitive textual comparison of non-image files

use crate::{
    backends::imagemagick::combined_output,
    config::TEXT_DIFF_EXCLUDED,
    error::{CompareError, Result},
};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::trace;

/// Runs `diff -w` on file pairs
#[derive(Debug, Clone)]
pub struct TextDiffer {
    program: String,
}

impl TextDiffer {
    #[must_use]
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Whether a file is never diffed textually
    #[must_use]
    pub fn is_excluded(file_name: &OsStr) -> bool {
        TEXT_DIFF_EXCLUDED
            .iter()
            .any(|excluded| OsStr::new(excluded) == file_name)
    }

    /// Diff two files, ignoring whitespace
    ///
    /// Returns `None` when they match and the diff output otherwise.
    ///
    /// # Errors
    ///
    /// Returns `CompareError::Spawn` when the program cannot be started and
    /// `CompareError::ToolFailed` for exit statuses other than 0 and 1.
    pub fn diff(&self, reference: &Path, generated: &Path) -> Result<Option<String>> {
        trace!(program = %self.program, reference = %reference.display(), "Running text diff");

        let output = Command::new(&self.program)
            .arg("-w")
            .arg(reference)
            .arg(generated)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| CompareError::spawn(&self.program, e))?;

        match output.status.code() {
            Some(0) => Ok(None),
            Some(1) => Ok(Some(combined_output(&output))),
            _ => Err(CompareError::tool_failed(
                &self.program,
                output.status,
                combined_output(&output),
            )),
        }
    }
}

impl Default for TextDiffer {
    fn default() -> Self {
        Self::new("diff")
    }
}
