//! Native backend
//!
//! Pure Rust comparison using the `image` crate, for hosts without ImageMagick.
//! The metric matches ImageMagick's normalized MSE: channel values are scaled to
//! `[0, 1]` and squared differences are averaged over every RGBA channel.

use super::ImageDiffBackend;
use crate::{
    error::{CompareError, Result},
    metric::MetricResult,
};
use image::{imageops, ImageFormat, Rgba, RgbaImage};
use std::path::Path;
use tracing::{debug, trace};

/// ImageMagick's default highlight color for differing pixels
const HIGHLIGHT: Rgba<u8> = Rgba([241, 0, 30, 255]);

/// Share of the reference kept when lowlighting equal pixels
const LOWLIGHT_KEEP: f32 = 0.2;

/// Comparison backend implemented in Rust
#[derive(Debug, Clone, Default)]
pub struct NativeBackend;

impl NativeBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn load_pair(reference: &Path, generated: &Path) -> Result<(RgbaImage, RgbaImage)> {
        let reference_image = image::open(reference)?.to_rgba8();
        let generated_image = image::open(generated)?.to_rgba8();

        if reference_image.dimensions() != generated_image.dimensions() {
            return Err(CompareError::ImageSizeMismatch {
                path: generated.to_path_buf(),
                reference: reference_image.dimensions(),
                generated: generated_image.dimensions(),
            });
        }

        Ok((reference_image, generated_image))
    }
}

/// Normalized mean squared error of two equally sized images
#[must_use]
pub fn mean_squared_error(reference: &RgbaImage, generated: &RgbaImage) -> f64 {
    let samples = reference.as_raw().len();
    if samples == 0 {
        return 0.0;
    }

    let sum: f64 = reference
        .as_raw()
        .iter()
        .zip(generated.as_raw())
        .map(|(&a, &b)| {
            let d = (f64::from(a) - f64::from(b)) / 255.0;
            d * d
        })
        .sum();

    sum / samples as f64
}

/// Difference image: highlighted where pixels differ, a faded reference elsewhere
#[must_use]
pub fn difference_image(reference: &RgbaImage, generated: &RgbaImage) -> RgbaImage {
    let (width, height) = reference.dimensions();
    RgbaImage::from_fn(width, height, |x, y| {
        let a = reference.get_pixel(x, y);
        let b = generated.get_pixel(x, y);
        if a == b {
            let Rgba([r, g, bl, _]) = *a;
            let fade = |c: u8| (f32::from(c) * LOWLIGHT_KEEP + 255.0 * (1.0 - LOWLIGHT_KEEP)) as u8;
            Rgba([fade(r), fade(g), fade(bl), 255])
        } else {
            HIGHLIGHT
        }
    })
}

/// Place images left to right on one canvas, top-aligned
#[must_use]
pub fn concatenate_horizontally(images: &[&RgbaImage]) -> RgbaImage {
    let width = images.iter().map(|img| img.width()).sum();
    let height = images.iter().map(|img| img.height()).max().unwrap_or(0);

    let mut canvas = RgbaImage::new(width, height);
    let mut x = 0i64;
    for img in images {
        imageops::replace(&mut canvas, *img, x, 0);
        x += i64::from(img.width());
    }
    canvas
}

impl ImageDiffBackend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn measure(&self, reference: &Path, generated: &Path) -> Result<MetricResult> {
        let (reference_image, generated_image) = Self::load_pair(reference, generated)?;
        let mse = mean_squared_error(&reference_image, &generated_image);
        trace!(reference = %reference.display(), mse, "Computed native mse");
        Ok(MetricResult::new(mse))
    }

    fn render_diff(&self, reference: &Path, generated: &Path, output: &Path) -> Result<()> {
        let (reference_image, generated_image) = Self::load_pair(reference, generated)?;
        let diff = difference_image(&reference_image, &generated_image);
        let strip = concatenate_horizontally(&[&reference_image, &diff, &generated_image]);

        debug!(
            output = %output.display(),
            width = strip.width(),
            height = strip.height(),
            "Writing diff strip"
        );
        strip.save_with_format(output, ImageFormat::Png)?;
        Ok(())
    }
}
