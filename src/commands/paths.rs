use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;
use crate::{config, lockfile};

/// Config file to read: the given path, or `farm.yaml` in the current directory.
#[tracing::instrument(skip(runtime))]
pub fn config_path<R: Runtime>(runtime: &R, explicit: Option<&Path>) -> Result<PathBuf> {
    resolve(runtime, explicit, config::DEFAULT_FILE_NAME)
}

/// Lockfile to use: the given path, or `farm.lock` in the current directory.
#[tracing::instrument(skip(runtime))]
pub fn lockfile_path<R: Runtime>(runtime: &R, explicit: Option<&Path>) -> Result<PathBuf> {
    resolve(runtime, explicit, lockfile::DEFAULT_FILE_NAME)
}

fn resolve<R: Runtime>(runtime: &R, explicit: Option<&Path>, default: &str) -> Result<PathBuf> {
    match explicit {
        Some(path) if path.is_absolute() => Ok(path.to_path_buf()),
        explicit => {
            let cwd = runtime
                .current_dir()
                .context("Could not determine current directory")?;
            Ok(cwd.join(explicit.unwrap_or(Path::new(default))))
        }
    }
}
