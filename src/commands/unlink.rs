use anyhow::{Context, Result};

use crate::linker::Linker;
use crate::lockfile::LockFile;
use crate::runtime::Runtime;

use super::{Options, environment_suffix, load_config, report_errors};

/// Remove every symlink recorded in the lockfile.
///
/// The environment only has to select something; the removal itself covers
/// all tracked links.
#[tracing::instrument(skip(runtime, options))]
pub fn unlink<R: Runtime>(runtime: &R, options: &Options, environment: Option<&str>) -> Result<()> {
    let Some(config) = load_config(runtime, options, environment)? else {
        return Ok(());
    };

    let lock_path = options.lockfile_path(runtime)?;
    let mut lock = LockFile::load(runtime, &lock_path).context("Failed to load lockfile")?;

    let result = Linker::new(runtime, &config, &mut lock, options.dry_run).unlink();

    if options.verbose || options.dry_run {
        if options.dry_run {
            println!("Will remove symlinks:");
        } else {
            println!("Removed symlinks:");
        }
        for removed in &result.removed {
            println!("  - {}", removed.display());
        }
    }

    if !options.dry_run {
        lock.save(runtime, &lock_path)
            .context("Failed to save lockfile")?;
        println!(
            "✓ Removed {} symlinks{}",
            result.removed.len(),
            environment_suffix(environment)
        );
    }

    report_errors(result, "unlinking")
}
