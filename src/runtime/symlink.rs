//! Symlink operations.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::RealRuntime;
use super::path::normalize_path;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn symlink_impl(&self, original: &Path, link: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::symlink as unix_symlink;
            unix_symlink(original, link).context("Failed to create symlink")?;
        }
        #[cfg(windows)]
        {
            use std::os::windows::fs::{symlink_dir, symlink_file};
            use tracing::trace;

            // A relative `original` is relative to the link's parent, not the CWD.
            let target_path = if original.is_absolute() {
                original.to_path_buf()
            } else {
                link.parent()
                    .context("Failed to get parent directory for symlink")?
                    .join(original)
            };

            if target_path.is_dir() {
                trace!("{} is a directory, creating directory symlink", target_path.display());
                symlink_dir(original, link).context("Failed to create directory symlink")?;
            } else {
                trace!("{} is a file, creating file symlink", target_path.display());
                symlink_file(original, link).context("Failed to create file symlink")?;
            }
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn resolve_link_impl(&self, path: &Path) -> Result<PathBuf> {
        let target = fs::read_link(path).context("Failed to read symlink")?;
        if target.is_absolute() {
            Ok(normalize_path(&target))
        } else {
            let parent = path
                .parent()
                .context("Failed to get parent directory of symlink")?;
            Ok(normalize_path(&parent.join(&target)))
        }
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_symlink_impl(&self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            fs::remove_file(path).context("Failed to remove symlink")?;
        }
        #[cfg(windows)]
        {
            // Directory symlinks need remove_dir, file symlinks need remove_file.
            fs::remove_dir(path)
                .or_else(|_| fs::remove_file(path))
                .context("Failed to remove symlink")?;
        }
        Ok(())
    }
}
