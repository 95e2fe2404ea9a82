//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::{Cli, CliBackend};
use crate::config::{BackendType, CompareConfig};
use anyhow::{Context, Result};

/// Convert CLI arguments to `CompareConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build `CompareConfig` from CLI arguments
    pub(crate) fn from_cli(cli: &Cli) -> Result<CompareConfig> {
        let backend_type = match cli.backend {
            CliBackend::Imagemagick => BackendType::ImageMagick,
            CliBackend::Native => BackendType::Native,
        };

        let config = CompareConfig::builder()
            .reference_dir(&cli.ref_dir)
            .render_dir(&cli.render_dir)
            .diff_dir(cli.diff_dir.clone())
            .threshold(cli.threshold)
            .image_pattern(cli.pattern.clone())
            .backend_type(backend_type)
            .compare_program(cli.compare_bin.clone())
            .montage_program(cli.montage_bin.clone())
            .diff_program(cli.diff_bin.clone())
            .text_diff(cli.text_diff)
            .build()
            .context("Invalid configuration")?;

        Ok(config)
    }

    /// Validate CLI arguments before building the configuration
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        if !cli.ref_dir.exists() {
            anyhow::bail!(
                "Reference directory does not exist: {}",
                cli.ref_dir.display()
            );
        }
        if !cli.ref_dir.is_dir() {
            anyhow::bail!(
                "Reference path is not a directory: {}",
                cli.ref_dir.display()
            );
        }

        if let Some(diff_dir) = &cli.diff_dir {
            if diff_dir.is_file() {
                anyhow::bail!(
                    "Diff output path exists and is a file, not a directory: {}",
                    diff_dir.display()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["refpng-compare"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_from_cli_maps_every_option() {
        let cli = parse(&[
            "ref",
            "render",
            "-d",
            "diffs",
            "-t",
            "0.0001",
            "--pattern",
            "*.tiff",
            "--backend",
            "native",
            "--compare-bin",
            "magick-compare",
            "--montage-bin",
            "magick-montage",
            "--text-diff",
            "--diff-bin",
            "gdiff",
        ]);
        let config = CliConfigBuilder::from_cli(&cli).unwrap();

        assert_eq!(config.reference_dir, PathBuf::from("ref"));
        assert_eq!(config.render_dir, PathBuf::from("render"));
        assert_eq!(config.diff_dir, Some(PathBuf::from("diffs")));
        assert!((config.threshold - 0.0001).abs() < f64::EPSILON);
        assert_eq!(config.image_pattern, "*.tiff");
        assert_eq!(config.backend_type, BackendType::Native);
        assert_eq!(config.programs.compare, "magick-compare");
        assert_eq!(config.programs.montage, "magick-montage");
        assert_eq!(config.programs.diff, "gdiff");
        assert!(config.text_diff);
    }

    #[test]
    fn test_from_cli_rejects_negative_threshold() {
        let cli = parse(&["ref", "render", "--threshold=-1"]);
        assert!(CliConfigBuilder::from_cli(&cli).is_err());
    }

    #[test]
    fn test_validate_cli_reference_dir() {
        let root = tempdir().unwrap();
        let ref_dir = root.path().to_str().unwrap();
        assert!(CliConfigBuilder::validate_cli(&parse(&[ref_dir, "render"])).is_ok());

        let missing = root.path().join("missing");
        let err = CliConfigBuilder::validate_cli(&parse(&[missing.to_str().unwrap(), "render"]))
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let file = root.path().join("file.png");
        std::fs::write(&file, b"").unwrap();
        let err = CliConfigBuilder::validate_cli(&parse(&[file.to_str().unwrap(), "render"]))
            .unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_validate_cli_diff_dir_is_file() {
        let root = tempdir().unwrap();
        let file = root.path().join("diffs");
        std::fs::write(&file, b"").unwrap();

        let cli = parse(&[
            root.path().to_str().unwrap(),
            "render",
            "--diff-dir",
            file.to_str().unwrap(),
        ]);
        assert!(CliConfigBuilder::validate_cli(&cli).is_err());
    }
}
