use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::lockfile::{LinkRecord, LockFile};
use crate::runtime::Runtime;

use super::{Options, environment_suffix, load_config};

/// Show tracked symlinks and any dead ones.
///
/// With an environment, only links whose source lies under one of its
/// packages are shown. With a package name, only links recorded for that
/// package are shown.
#[tracing::instrument(skip(runtime, options))]
pub fn status<R: Runtime>(
    runtime: &R,
    options: &Options,
    environment: Option<&str>,
    package: Option<&str>,
) -> Result<()> {
    let lock_path = options.lockfile_path(runtime)?;
    let lock = LockFile::load(runtime, &lock_path).context("Failed to load lockfile")?;

    if lock.is_empty() {
        println!("No symlinks tracked");
        return Ok(());
    }

    let sources: Option<Vec<PathBuf>> = match environment {
        Some(_) => match load_config(runtime, options, environment)? {
            Some(config) => Some(config.sources()),
            None => return Ok(()),
        },
        None => None,
    };

    let mut relevant: Vec<&LinkRecord> = match &sources {
        Some(sources) => lock.links_under_sources(sources).collect(),
        None => lock.links().collect(),
    };
    if let Some(name) = package {
        let owned: Vec<&LinkRecord> = lock.links_for_package(name).collect();
        relevant.retain(|link| owned.iter().any(|o| o.target == link.target));
    }

    let mut suffix = environment_suffix(environment);
    if let Some(name) = package {
        suffix.push_str(&format!(" in package '{}'", name));
    }
    if relevant.is_empty() {
        println!("No symlinks tracked{}", suffix);
        return Ok(());
    }

    if options.verbose {
        println!("Tracking {} symlinks{}:\n", relevant.len(), suffix);
        for link in &relevant {
            let folded = if link.is_folded { " [folded]" } else { "" };
            println!("  {} -> {}{}", link.target.display(), link.source.display(), folded);
        }
    } else {
        println!("Tracking {} symlinks{}", relevant.len(), suffix);
    }

    let dead: Vec<PathBuf> = lock
        .dead_links(runtime)
        .context("Failed to check for dead symlinks")?
        .into_iter()
        .filter(|target| relevant.iter().any(|link| &link.target == target))
        .collect();

    if !dead.is_empty() {
        println!("\n⚠ Found {} dead symlinks:", dead.len());
        for target in &dead {
            println!("  ✗ {}", target.display());
        }
        let command = match environment {
            Some(env) => format!("farm link {}", env),
            None => "farm link".to_string(),
        };
        println!("\nRun '{}' to clean up dead symlinks", command);
    }

    Ok(())
}
