//! Tree linker.
//!
//! Projects every package source tree into each of its targets as relative
//! symlinks, folding whole directories where the fold rules allow it, and
//! keeps the lockfile in step with what is on disk.
//!
//! A run never stops at the first bad entry. Conflicts, unreadable
//! directories and failed removals are collected in [`LinkResult::errors`]
//! and the walk moves on to the next sibling. Only a lockfile failure during
//! the dead-link scan aborts [`Linker::link`].

mod error;
pub mod fold;

pub use error::LinkError;

use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::config::{Config, Package};
use crate::lockfile::{LinkRecord, LockError, LockFile};
use crate::pattern;
use crate::runtime::{FileKind, Runtime, is_not_found, relative_symlink_path};

/// What a link or unlink pass did.
#[derive(Debug, Default)]
pub struct LinkResult {
    /// Targets where a symlink was created (or would be, in dry-run)
    pub created: Vec<PathBuf>,
    /// Targets whose symlink was removed along with its record
    pub removed: Vec<PathBuf>,
    pub errors: Vec<LinkError>,
}

impl LinkResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub struct Linker<'a, R: Runtime> {
    runtime: &'a R,
    config: &'a Config,
    lock: &'a mut LockFile,
    dry_run: bool,
}

impl<'a, R: Runtime> Linker<'a, R> {
    /// `config` must already be validated.
    pub fn new(runtime: &'a R, config: &'a Config, lock: &'a mut LockFile, dry_run: bool) -> Self {
        Self {
            runtime,
            config,
            lock,
            dry_run,
        }
    }

    /// Remove dead links, then link every package into each of its targets.
    #[tracing::instrument(skip(self))]
    pub fn link(&mut self) -> Result<LinkResult, LockError> {
        let mut result = LinkResult::default();

        for target in self.lock.dead_links(self.runtime)? {
            info!("Removing dead symlink {:?}", target);
            self.remove_tracked(target, &mut result);
        }

        let config = self.config;
        for package in &config.packages {
            debug!("Linking package {}", package.display_name());
            for target_dir in &package.targets {
                if let Err(e) = self.link_directory(package, &package.source, target_dir, "", &mut result) {
                    warn!("Skipping {:?} for package {}: {}", target_dir, package.display_name(), e);
                    result.errors.push(e);
                }
            }
        }

        Ok(result)
    }

    /// Remove every tracked symlink and forget it.
    #[tracing::instrument(skip(self))]
    pub fn unlink(&mut self) -> LinkResult {
        let mut result = LinkResult::default();

        let targets: Vec<PathBuf> = self.lock.links().map(|link| link.target.clone()).collect();
        for target in targets {
            self.remove_tracked(target, &mut result);
        }

        result
    }

    /// Delete the symlink at `target` and drop its record. A failure keeps the
    /// record so the next run tries again.
    fn remove_tracked(&mut self, target: PathBuf, result: &mut LinkResult) {
        if !self.dry_run
            && let Err(e) = self.runtime.remove_symlink(&target)
            && !is_not_found(&e)
        {
            warn!("Failed to remove {:?}: {}", target, e);
            result.errors.push(LinkError::Remove {
                path: target,
                source: e,
            });
            return;
        }

        self.lock.remove_symlink(&target);
        result.removed.push(target);
    }

    /// Link the entries of `source_dir` into `target_dir`.
    ///
    /// `relative_dir` is `source_dir` relative to the package source, `/`
    /// separated and empty at the root. Only the listing of `source_dir`
    /// itself is returned as an error; failures below it go to `result`.
    fn link_directory(
        &mut self,
        package: &Package,
        source_dir: &Path,
        target_dir: &Path,
        relative_dir: &str,
        result: &mut LinkResult,
    ) -> Result<(), LinkError> {
        let mut entries = self
            .runtime
            .read_dir(source_dir)
            .map_err(|source| LinkError::ReadDir {
                path: source_dir.to_path_buf(),
                source,
            })?;
        entries.sort();

        for entry in entries {
            let Some(file_name) = entry.file_name().map(|n| n.to_os_string()) else {
                continue;
            };
            // patterns see a lossy name, the filesystem the exact one
            let name = file_name.to_string_lossy().into_owned();
            let relative = pattern::join(relative_dir, &name);

            if package.is_ignored(&relative) {
                debug!("Ignoring {}", relative);
                continue;
            }

            let kind = match self.runtime.file_kind(&entry) {
                Ok(Some(kind)) => kind,
                Ok(None) => continue,
                Err(source) => {
                    result.errors.push(LinkError::Inspect { path: entry, source });
                    continue;
                }
            };

            let target = target_dir.join(&file_name);
            let outcome = if kind == FileKind::Dir {
                if fold::should_fold(&name, relative_dir, package) {
                    debug!("Folding {}", relative);
                    self.create_symlink(package, &entry, &target, true, result)
                } else {
                    self.link_directory(package, &entry, &target, &relative, result)
                }
            } else {
                self.create_symlink(package, &entry, &target, false, result)
            };

            if let Err(e) = outcome {
                warn!("{}", e);
                result.errors.push(e);
            }
        }

        Ok(())
    }

    /// Make `target` a relative symlink to `source` and record it.
    ///
    /// A symlink already pointing at `source` is only recorded, not counted
    /// as created. One pointing anywhere else is replaced. Anything that is
    /// not a symlink is left alone and reported as a conflict.
    fn create_symlink(
        &mut self,
        package: &Package,
        source: &Path,
        target: &Path,
        is_folded: bool,
        result: &mut LinkResult,
    ) -> Result<(), LinkError> {
        if !self.dry_run
            && let Some(parent) = target.parent()
        {
            self.runtime
                .create_dir_all(parent)
                .map_err(|source| LinkError::CreateParent {
                    path: target.to_path_buf(),
                    source,
                })?;
        }

        let existing = self
            .runtime
            .file_kind(target)
            .map_err(|source| LinkError::Inspect {
                path: target.to_path_buf(),
                source,
            })?;

        match existing {
            Some(FileKind::Symlink) => {
                if self
                    .runtime
                    .resolve_link(target)
                    .is_ok_and(|destination| destination == source)
                {
                    debug!("{:?} already links to {:?}", target, source);
                    self.record(package, source, target, is_folded);
                    return Ok(());
                }

                debug!("Replacing symlink {:?}", target);
                if !self.dry_run {
                    self.runtime
                        .remove_symlink(target)
                        .map_err(|source| LinkError::RemoveExisting {
                            path: target.to_path_buf(),
                            source,
                        })?;
                }
            }
            Some(_) => {
                return Err(LinkError::Conflict {
                    path: target.to_path_buf(),
                });
            }
            None => {}
        }

        let original = relative_symlink_path(target, source).ok_or_else(|| LinkError::RelativePath {
            target: target.to_path_buf(),
            original: source.to_path_buf(),
        })?;

        if !self.dry_run {
            self.runtime
                .symlink(&original, target)
                .map_err(|e| LinkError::Create {
                    target: target.to_path_buf(),
                    original: original.clone(),
                    source: e,
                })?;
        }

        info!("Linked {:?} -> {:?}", target, original);
        self.record(package, source, target, is_folded);
        result.created.push(target.to_path_buf());
        Ok(())
    }

    fn record(&mut self, package: &Package, source: &Path, target: &Path, is_folded: bool) {
        self.lock.insert(
            LinkRecord::new(target.to_path_buf(), source.to_path_buf(), is_folded)
                .with_package(package.name.clone()),
        );
    }
}
