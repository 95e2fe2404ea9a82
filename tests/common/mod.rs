//! Shared fixtures for integration tests

#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

pub const BLACK: [u8; 4] = [0, 0, 0, 255];
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// A reference tree and a render tree in one temporary directory
pub struct RenderTrees {
    root: TempDir,
}

impl RenderTrees {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir_all(root.path().join("reference")).unwrap();
        fs::create_dir_all(root.path().join("render")).unwrap();
        Self { root }
    }

    pub fn reference_dir(&self) -> PathBuf {
        self.root.path().join("reference")
    }

    pub fn render_dir(&self) -> PathBuf {
        self.root.path().join("render")
    }

    pub fn diff_dir(&self) -> PathBuf {
        self.root.path().join("diffs")
    }

    pub fn reference(&self, relative: &str) -> PathBuf {
        self.reference_dir().join(relative)
    }

    pub fn render(&self, relative: &str) -> PathBuf {
        self.render_dir().join(relative)
    }

    /// Write the same solid image on both sides
    pub fn identical_pair(&self, relative: &str, width: u32, height: u32, color: [u8; 4]) {
        let img = solid(width, height, color);
        write_png(&self.reference(relative), &img);
        write_png(&self.render(relative), &img);
    }

    /// Write a solid reference and a render with one pixel replaced
    pub fn one_pixel_pair(
        &self,
        relative: &str,
        width: u32,
        height: u32,
        color: [u8; 4],
        changed: [u8; 4],
    ) {
        let reference = solid(width, height, color);
        let mut generated = reference.clone();
        generated.put_pixel(0, 0, Rgba(changed));
        write_png(&self.reference(relative), &reference);
        write_png(&self.render(relative), &generated);
    }

    pub fn reference_only(&self, relative: &str, contents: &[u8]) {
        write_file(&self.reference(relative), contents);
    }

    pub fn both(&self, relative: &str, reference: &[u8], render: &[u8]) {
        write_file(&self.reference(relative), reference);
        write_file(&self.render(relative), render);
    }
}

pub fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

pub fn write_png(path: &Path, img: &RgbaImage) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    img.save(path).expect("Failed to write PNG fixture");
}

pub fn write_file(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Whether a program can be started from PATH
pub fn program_available(program: &str) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

pub fn imagemagick_available() -> bool {
    program_available("compare") && program_available("montage")
}
