//! ImageMagick backend
//!
//! Drives the `compare` and `montage` executables. `compare` exits with status 0
//! for identical images, 1 for dissimilar images and 2 on error.

use super::ImageDiffBackend;
use crate::{
    error::{CompareError, Result},
    metric::{parse_metric, MetricResult},
};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tracing::{debug, trace};

const STATUS_IDENTICAL: i32 = 0;
const STATUS_DISSIMILAR: i32 = 1;

/// Comparison backend backed by ImageMagick command-line tools
#[derive(Debug, Clone)]
pub struct ImageMagickBackend {
    compare_program: String,
    montage_program: String,
}

impl ImageMagickBackend {
    #[must_use]
    pub fn new(compare_program: String, montage_program: String) -> Self {
        Self {
            compare_program,
            montage_program,
        }
    }

    #[must_use]
    pub fn compare_program(&self) -> &str {
        &self.compare_program
    }

    #[must_use]
    pub fn montage_program(&self) -> &str {
        &self.montage_program
    }
}

impl Default for ImageMagickBackend {
    fn default() -> Self {
        Self::new("compare".to_string(), "montage".to_string())
    }
}

/// stdout followed by stderr, the way a shell `2>&1` capture reads
pub(crate) fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

impl ImageDiffBackend for ImageMagickBackend {
    fn name(&self) -> &'static str {
        "imagemagick"
    }

    fn measure(&self, reference: &Path, generated: &Path) -> Result<MetricResult> {
        trace!(
            program = %self.compare_program,
            reference = %reference.display(),
            generated = %generated.display(),
            "Running mse comparison"
        );

        let output = Command::new(&self.compare_program)
            .args(["-metric", "mse"])
            .arg(reference)
            .arg(generated)
            .arg("null:")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| CompareError::spawn(&self.compare_program, e))?;

        let text = combined_output(&output);
        match output.status.code() {
            Some(STATUS_IDENTICAL) => Ok(MetricResult::identical()),
            Some(STATUS_DISSIMILAR) => parse_metric(&text),
            _ => Err(CompareError::tool_failed(
                &self.compare_program,
                output.status,
                text,
            )),
        }
    }

    fn render_diff(&self, reference: &Path, generated: &Path, output: &Path) -> Result<()> {
        debug!(output = %output.display(), "Composing diff image");

        let mut compare = Command::new(&self.compare_program)
            .arg(reference)
            .arg(generated)
            .arg("png:-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CompareError::spawn(&self.compare_program, e))?;

        let diff_stream = compare.stdout.take().ok_or_else(|| {
            CompareError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "compare stdout was not captured",
            ))
        })?;

        let montage = {
            let mut command = Command::new(&self.montage_program);
            command
                .arg(reference)
                .arg("-")
                .arg(generated)
                .args(["-tile", "3x1", "-geometry", "+0+0"])
                .arg(output)
                .stdin(Stdio::from(diff_stream))
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
            command.spawn()
            // `command` drops here, closing the parent's end of the pipe
        };

        let montage = match montage {
            Ok(child) => child,
            Err(e) => {
                let _ = compare.kill();
                let _ = compare.wait();
                return Err(CompareError::spawn(&self.montage_program, e));
            },
        };

        let montage_output = montage.wait_with_output()?;
        let compare_status = compare.wait()?;

        if !montage_output.status.success() {
            return Err(CompareError::tool_failed(
                &self.montage_program,
                montage_output.status,
                combined_output(&montage_output),
            ));
        }

        match compare_status.code() {
            Some(STATUS_IDENTICAL | STATUS_DISSIMILAR) => Ok(()),
            _ => Err(CompareError::tool_failed(
                &self.compare_program,
                compare_status,
                String::new(),
            )),
        }
    }
}
