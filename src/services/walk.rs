//! Reference tree traversal
//!
//! Pairs every file under the reference root with the path it is expected at
//! under the render root.

use crate::error::{CompareError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A reference file and the generated file it is compared against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonTask {
    /// File under the reference root
    pub reference: PathBuf,
    /// Expected counterpart under the render root
    pub generated: PathBuf,
    /// Path of the file relative to the reference root
    pub relative: PathBuf,
}

impl ComparisonTask {
    /// Build the task for a reference file located under `reference_root`
    ///
    /// # Errors
    ///
    /// Returns `CompareError::InvalidConfig` when `reference` is not inside
    /// `reference_root`.
    pub fn new(reference_root: &Path, render_root: &Path, reference: &Path) -> Result<Self> {
        let relative = reference.strip_prefix(reference_root).map_err(|_| {
            CompareError::invalid_config(format!(
                "{} is not inside {}",
                reference.display(),
                reference_root.display()
            ))
        })?;

        Ok(Self {
            reference: reference.to_path_buf(),
            generated: render_root.join(relative),
            relative: relative.to_path_buf(),
        })
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&OsStr> {
        self.reference.file_name()
    }

    /// Whether the generated counterpart is present on disk
    #[must_use]
    pub fn counterpart_exists(&self) -> bool {
        self.generated.exists()
    }

    /// Flat file name for this task's diff image: `<relative-dir>-<filename>`
    ///
    /// Separators of the relative directory become `-`, so every diff image
    /// lands directly in the diff directory. Files at the reference root keep
    /// their bare name.
    #[must_use]
    pub fn diff_file_name(&self) -> String {
        let file_name = self
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let dir_parts: Vec<String> = self
            .relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();

        if dir_parts.is_empty() {
            file_name
        } else {
            format!("{}-{}", dir_parts.join("-"), file_name)
        }
    }
}

/// Walks a reference tree and yields one task per file
#[derive(Debug, Clone)]
pub struct ReferenceWalker {
    reference_root: PathBuf,
    render_root: PathBuf,
}

impl ReferenceWalker {
    #[must_use]
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(reference_root: P, render_root: Q) -> Self {
        Self {
            reference_root: reference_root.as_ref().to_path_buf(),
            render_root: render_root.as_ref().to_path_buf(),
        }
    }

    /// Iterate over tasks in walk order
    ///
    /// Within a directory, files come first, sorted by name, followed by each
    /// subdirectory in name order.
    ///
    /// Directories are not yielded. Symlinks are not followed while walking, but a
    /// symlink that resolves to a file is yielded like a regular file.
    pub fn tasks(&self) -> impl Iterator<Item = Result<ComparisonTask>> + '_ {
        WalkDir::new(&self.reference_root)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_map(move |entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(CompareError::from(e))),
                };
                if entry.file_type().is_dir() || entry.path().is_dir() {
                    return None;
                }
                Some(ComparisonTask::new(
                    &self.reference_root,
                    &self.render_root,
                    entry.path(),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_task_paths() {
        let task = ComparisonTask::new(
            Path::new("/ref"),
            Path::new("/render"),
            Path::new("/ref/a/b/x.png"),
        )
        .unwrap();

        assert_eq!(task.generated, PathBuf::from("/render/a/b/x.png"));
        assert_eq!(task.relative, PathBuf::from("a/b/x.png"));
        assert_eq!(task.file_name(), Some(OsStr::new("x.png")));
    }

    #[test]
    fn test_task_outside_root_is_error() {
        let result = ComparisonTask::new(
            Path::new("/ref"),
            Path::new("/render"),
            Path::new("/elsewhere/x.png"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_diff_file_name() {
        let nested = ComparisonTask::new(
            Path::new("ref"),
            Path::new("out"),
            Path::new("ref/imsc1/ttml/0.000000.png"),
        )
        .unwrap();
        assert_eq!(nested.diff_file_name(), "imsc1-ttml-0.000000.png");

        let single = ComparisonTask::new(
            Path::new("ref"),
            Path::new("out"),
            Path::new("ref/a/x.png"),
        )
        .unwrap();
        assert_eq!(single.diff_file_name(), "a-x.png");

        let root = ComparisonTask::new(Path::new("ref"), Path::new("out"), Path::new("ref/x.png"))
            .unwrap();
        assert_eq!(root.diff_file_name(), "x.png");
    }

    #[test]
    fn test_walker_yields_files_before_subdirectories() {
        let reference = tempdir().unwrap();
        let render = tempdir().unwrap();

        fs::create_dir_all(reference.path().join("b")).unwrap();
        fs::create_dir_all(reference.path().join("a/empty")).unwrap();
        fs::write(reference.path().join("b/2.png"), b"").unwrap();
        fs::write(reference.path().join("b/1.png"), b"").unwrap();
        fs::write(reference.path().join("a/manifest.json"), b"{}").unwrap();
        fs::write(reference.path().join("top.png"), b"").unwrap();

        let walker = ReferenceWalker::new(reference.path(), render.path());
        let relative: Vec<PathBuf> = walker
            .tasks()
            .map(|task| task.unwrap().relative)
            .collect();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("top.png"),
                PathBuf::from("a/manifest.json"),
                PathBuf::from("b/1.png"),
                PathBuf::from("b/2.png"),
            ]
        );
    }

    #[test]
    fn test_walker_maps_into_render_root() {
        let reference = tempdir().unwrap();
        let render = tempdir().unwrap();
        fs::create_dir_all(reference.path().join("a")).unwrap();
        fs::write(reference.path().join("a/x.png"), b"").unwrap();

        let tasks = ReferenceWalker::new(reference.path(), render.path())
            .tasks()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].generated, render.path().join("a/x.png"));
        assert!(!tasks[0].counterpart_exists());

        fs::create_dir_all(render.path().join("a")).unwrap();
        fs::write(render.path().join("a/x.png"), b"").unwrap();
        assert!(tasks[0].counterpart_exists());
    }

    #[test]
    fn test_walker_missing_root_is_error() {
        let root = tempdir().unwrap();
        let walker = ReferenceWalker::new(root.path().join("missing"), root.path());
        assert!(matches!(
            walker.tasks().collect::<Result<Vec<_>>>(),
            Err(CompareError::Walk(_))
        ));
    }
}
