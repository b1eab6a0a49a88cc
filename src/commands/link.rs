use anyhow::{Context, Result};
use log::debug;

use crate::linker::{LinkResult, Linker};
use crate::lockfile::LockFile;
use crate::runtime::Runtime;

use super::{Options, environment_suffix, load_config, report_errors};

/// Link the packages selected for `environment` and save the lockfile.
#[tracing::instrument(skip(runtime, options))]
pub fn link<R: Runtime>(runtime: &R, options: &Options, environment: Option<&str>) -> Result<()> {
    let Some(config) = load_config(runtime, options, environment)? else {
        return Ok(());
    };

    let lock_path = options.lockfile_path(runtime)?;
    let mut lock = LockFile::load(runtime, &lock_path).context("Failed to load lockfile")?;
    debug!("Using lockfile {:?}", lock_path);

    let result = Linker::new(runtime, &config, &mut lock, options.dry_run)
        .link()
        .context("Failed to link")?;

    if options.verbose || options.dry_run {
        print_result(&result, options.dry_run);
    }

    if !options.dry_run {
        lock.save(runtime, &lock_path)
            .context("Failed to save lockfile")?;
        println!(
            "✓ Linked {} files, removed {} dead links{}",
            result.created.len(),
            result.removed.len(),
            environment_suffix(environment)
        );
    }

    report_errors(result, "linking")
}

fn print_result(result: &LinkResult, dry_run: bool) {
    if !result.created.is_empty() {
        if dry_run {
            println!("Will create symlinks:");
        } else {
            println!("Created symlinks:");
        }
        for created in &result.created {
            println!("  + {}", created.display());
        }
    }

    if !result.removed.is_empty() {
        if dry_run {
            println!("\nWill remove dead symlinks:");
        } else {
            println!("\nRemoved dead symlinks:");
        }
        for removed in &result.removed {
            println!("  - {}", removed.display());
        }
    }
}
