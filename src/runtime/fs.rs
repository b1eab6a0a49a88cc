//! File system operations (read, write, directory, lstat).

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{FileKind, RealRuntime};

impl RealRuntime {
    #[tracing::instrument(skip(self, contents))]
    pub(crate) fn write_impl(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).context("Failed to write to file")?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context("Failed to read file to string")
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn create_dir_all_impl(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).context("Failed to create directory")?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn try_exists_impl(&self, path: &Path) -> Result<bool> {
        path.try_exists().context("Failed to check path existence")
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_dir_impl(&self, path: &Path) -> Result<Vec<PathBuf>> {
        fs::read_dir(path)
            .context("Failed to read directory")?
            .map(|entry| Ok(entry?.path()))
            .collect()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn file_kind_impl(&self, path: &Path) -> Result<Option<FileKind>> {
        match fs::symlink_metadata(path) {
            Ok(metadata) => {
                let file_type = metadata.file_type();
                let kind = if file_type.is_symlink() {
                    FileKind::Symlink
                } else if file_type.is_dir() {
                    FileKind::Dir
                } else {
                    FileKind::File
                };
                Ok(Some(kind))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read file metadata"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{FileKind, RealRuntime, Runtime};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_file_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("farm.lock");

        runtime.write(&file_path, b"{}").unwrap();
        assert!(runtime.try_exists(&file_path).unwrap());
        assert_eq!(runtime.file_kind(&file_path).unwrap(), Some(FileKind::File));

        let content = runtime.read_to_string(&file_path).unwrap();
        assert_eq!(content, "{}");
    }

    #[test]
    fn test_real_runtime_dir_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("sub/nested");

        runtime.create_dir_all(&sub_dir).unwrap();
        assert!(runtime.try_exists(&sub_dir).unwrap());
        assert_eq!(runtime.file_kind(&sub_dir).unwrap(), Some(FileKind::Dir));

        let entries = runtime.read_dir(&dir.path().join("sub")).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with("nested"));
    }

    #[test]
    fn test_real_runtime_file_kind() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        let sub = dir.path().join("sub");
        runtime.write(&file, b"x").unwrap();
        runtime.create_dir_all(&sub).unwrap();

        assert_eq!(runtime.file_kind(&file).unwrap(), Some(FileKind::File));
        assert_eq!(runtime.file_kind(&sub).unwrap(), Some(FileKind::Dir));
        assert_eq!(runtime.file_kind(&dir.path().join("missing")).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_real_runtime_file_kind_does_not_follow_symlinks() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        runtime.create_dir_all(&sub).unwrap();

        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&sub, &link).unwrap();
        assert_eq!(runtime.file_kind(&link).unwrap(), Some(FileKind::Symlink));

        let dangling = dir.path().join("dangling");
        std::os::unix::fs::symlink(dir.path().join("gone"), &dangling).unwrap();
        assert_eq!(runtime.file_kind(&dangling).unwrap(), Some(FileKind::Symlink));
    }

    #[test]
    fn test_real_runtime_errors() {
        let runtime = RealRuntime;

        let result = runtime.read_to_string(std::path::Path::new("/nonexistent/path/farm.lock"));
        assert!(result.is_err());

        let result = runtime.read_dir(std::path::Path::new("/nonexistent/path"));
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_real_runtime_try_exists() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("farm.lock");
        std::fs::write(&file_path, "{}").unwrap();

        assert!(runtime.try_exists(&file_path).unwrap());
        assert!(!runtime.try_exists(&dir.path().join("missing")).unwrap());
        // a regular file in the middle of the path is not "missing"
        assert!(runtime.try_exists(&file_path.join("child")).is_err());
    }
}
