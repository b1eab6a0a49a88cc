//! Lockfile tracking every symlink farm owns.
//!
//! The lockfile is the declared ground truth of "links this tool created".
//! It is loaded at the start of a run, mutated in memory while linking or
//! unlinking, and written back by overwriting the file once the run is done
//! (never in dry-run mode).
//!
//! Records are kept in an ordered map, so every listing and every dead-link
//! scan walks them sorted by target path.
//!
//! Concurrent runs against the same lockfile are not coordinated: there is no
//! file locking, and the last writer wins.

mod error;
mod record;

pub use error::LockError;
pub use record::LinkRecord;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::runtime::{FileKind, Runtime, is_not_found, is_path_under};

pub const CURRENT_VERSION: &str = "1.0";
pub const DEFAULT_FILE_NAME: &str = "farm.lock";

/// Tracked symlinks keyed by absolute target path.
pub type SymlinkMap = BTreeMap<PathBuf, LinkRecord>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LockFile {
    pub version: String,
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub symlinks: SymlinkMap,
}

impl Default for LockFile {
    fn default() -> Self {
        Self::new()
    }
}

impl LockFile {
    /// Empty lockfile at the current schema version.
    pub fn new() -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            updated: Utc::now(),
            symlinks: SymlinkMap::new(),
        }
    }

    /// Load a lockfile, or start a fresh one if none exists at `path`.
    ///
    /// Only a missing file counts as "none". Any other read failure is an
    /// error, so an unreadable lockfile is never silently replaced.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self, LockError> {
        let content = match runtime.read_to_string(path) {
            Ok(content) => content,
            Err(e) if is_not_found(&e) => {
                debug!("No lockfile at {:?}, starting empty", path);
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(LockError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let lock: LockFile = serde_json::from_str(&content).map_err(|source| LockError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if lock.version != CURRENT_VERSION {
            return Err(LockError::UnsupportedVersion {
                found: lock.version,
                expected: CURRENT_VERSION.to_string(),
            });
        }

        debug!("Loaded {} tracked symlink(s) from {:?}", lock.symlinks.len(), path);
        Ok(lock)
    }

    /// Stamp the update time and overwrite `path` with the full lockfile.
    #[tracing::instrument(skip(self, runtime))]
    pub fn save<R: Runtime>(&mut self, runtime: &R, path: &Path) -> Result<(), LockError> {
        self.updated = Utc::now();

        let content = serde_json::to_string_pretty(self).map_err(LockError::Serialize)?;
        runtime
            .write(path, content.as_bytes())
            .map_err(|source| LockError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Record (or re-record) the symlink at `target`.
    pub fn add_symlink(&mut self, target: &Path, source: &Path, is_folded: bool) {
        self.insert(LinkRecord::new(
            target.to_path_buf(),
            source.to_path_buf(),
            is_folded,
        ));
    }

    pub fn insert(&mut self, record: LinkRecord) {
        self.symlinks.insert(record.target.clone(), record);
    }

    /// Forget the symlink at `target`. Unknown targets are ignored.
    pub fn remove_symlink(&mut self, target: &Path) {
        self.symlinks.remove(target);
    }

    pub fn get(&self, target: &Path) -> Option<&LinkRecord> {
        self.symlinks.get(target)
    }

    pub fn contains(&self, target: &Path) -> bool {
        self.symlinks.contains_key(target)
    }

    pub fn len(&self) -> usize {
        self.symlinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symlinks.is_empty()
    }

    /// All records, sorted by target path.
    pub fn links(&self) -> impl Iterator<Item = &LinkRecord> {
        self.symlinks.values()
    }

    /// Records whose source lies under one of `sources`, sorted by target path.
    pub fn links_under_sources<'a>(
        &'a self,
        sources: &'a [PathBuf],
    ) -> impl Iterator<Item = &'a LinkRecord> + 'a {
        self.links().filter(move |link| {
            sources
                .iter()
                .any(|source| is_path_under(&link.source, source))
        })
    }

    /// Records tagged with package `name`, sorted by target path.
    pub fn links_for_package<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a LinkRecord> + 'a {
        self.links()
            .filter(move |link| link.package.as_deref() == Some(name))
    }

    /// Find tracked targets that are dead, sorted by target path.
    ///
    /// A target is dead when nothing exists at it, or when it is a symlink that
    /// cannot be read, whose destination is gone, or whose destination is not
    /// the recorded source. Something other than a symlink at the target is
    /// left for the caller to judge and is not reported. A destination whose
    /// existence cannot be checked is not treated as gone.
    #[tracing::instrument(skip(self, runtime))]
    pub fn dead_links<R: Runtime>(&self, runtime: &R) -> Result<Vec<PathBuf>, LockError> {
        let mut dead = Vec::new();

        for link in self.links() {
            let kind = runtime
                .file_kind(&link.target)
                .map_err(|source| LockError::Inspect {
                    path: link.target.clone(),
                    source,
                })?;

            match kind {
                None => {
                    debug!("{:?} no longer exists", link.target);
                    dead.push(link.target.clone());
                }
                Some(FileKind::Symlink) => match runtime.resolve_link(&link.target) {
                    Ok(destination) => match runtime.try_exists(&destination) {
                        Ok(false) => {
                            debug!("{:?} points to missing {:?}", link.target, destination);
                            dead.push(link.target.clone());
                        }
                        Ok(true) if destination != link.source => {
                            debug!(
                                "{:?} points to {:?} instead of {:?}",
                                link.target, destination, link.source
                            );
                            dead.push(link.target.clone());
                        }
                        Ok(true) => {}
                        Err(e) => {
                            warn!("Cannot check {:?}, keeping {:?}: {:#}", destination, link.target, e);
                        }
                    },
                    Err(e) => {
                        debug!("Cannot read {:?}: {}", link.target, e);
                        dead.push(link.target.clone());
                    }
                },
                Some(_) => {}
            }
        }

        Ok(dead)
    }
}
