//! Runtime abstraction for system operations.
//!
//! This module provides a trait-based abstraction over system operations,
//! enabling dependency injection and testability.
//!
//! # Structure
//!
//! - `path` - Path utility functions (normalize, is_path_under, relative_symlink_path)
//! - `env` - Home and working directory lookup
//! - `fs` - File system operations (read, write, directory, lstat)
//! - `symlink` - Symlink operations (create, resolve, remove)

mod env;
mod fs;
pub mod path;
mod symlink;

use anyhow::Result;
use std::io;
use std::path::{Path, PathBuf};

pub use path::{expand_home, is_path_under, normalize_path, relative_symlink_path};

/// What occupies a path, as reported without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Dir,
    Symlink,
}

#[cfg_attr(test, mockall::automock)]
pub trait Runtime {
    // File System
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Follows symlinks. `Ok(false)` only when the path is missing; any other
    /// stat failure is an error.
    fn try_exists(&self, path: &Path) -> Result<bool>;
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Inspect a path without following symlinks.
    /// Returns `Ok(None)` when nothing exists at `path`.
    fn file_kind(&self, path: &Path) -> Result<Option<FileKind>>;

    // Symlinks
    fn symlink(&self, original: &Path, link: &Path) -> Result<()>;

    /// Resolve a symlink to an absolute path (without recursively resolving symlinks).
    /// If the link target is relative, it is resolved relative to the link's parent directory.
    fn resolve_link(&self, path: &Path) -> Result<PathBuf>;

    fn remove_symlink(&self, path: &Path) -> Result<()>;

    // Directories
    fn home_dir(&self) -> Option<PathBuf>;
    fn current_dir(&self) -> Result<PathBuf>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn try_exists(&self, path: &Path) -> Result<bool> {
        self.try_exists_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn file_kind(&self, path: &Path) -> Result<Option<FileKind>> {
        self.file_kind_impl(path)
    }

    fn symlink(&self, original: &Path, link: &Path) -> Result<()> {
        self.symlink_impl(original, link)
    }

    fn resolve_link(&self, path: &Path) -> Result<PathBuf> {
        self.resolve_link_impl(path)
    }

    fn remove_symlink(&self, path: &Path) -> Result<()> {
        self.remove_symlink_impl(path)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home_dir_impl()
    }

    fn current_dir(&self) -> Result<PathBuf> {
        self.current_dir_impl()
    }
}

/// Check whether an error returned by a [`Runtime`] was caused by a missing path.
pub fn is_not_found(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
    })
}
