//! Package configuration.
//!
//! Parses `farm.yaml` into the list of packages the linker works on, and
//! validates it: every source and target is made absolute and normalized,
//! and each package gets its merged ignore patterns. The linker relies on
//! this having happened and never re-checks.
//!
//! ```yaml
//! ignore:
//!   - "*.swp"
//! packages:
//!   - name: nvim
//!     source: nvim
//!     targets: ["~"]
//!     fold: [".config/nvim"]
//!     no_fold: [".config/nvim/spell"]
//!   - source: work
//!     targets: ["~"]
//!     environments: [work]
//! ```

mod package;

pub use package::{DEFAULT_IGNORE_PATTERNS, Package};

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::runtime::{Runtime, expand_home, normalize_path};

pub const DEFAULT_FILE_NAME: &str = "farm.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("package {index}: source is required")]
    MissingSource { index: usize },

    #[error("package {index}: at least one target is required")]
    MissingTargets { index: usize },

    #[error("package {index}: empty target path")]
    EmptyTarget { index: usize },

    #[error("package {index}: cannot expand {path:?} without a home directory")]
    NoHome { index: usize, path: PathBuf },

    #[error("cannot resolve relative paths")]
    CurrentDir(#[source] anyhow::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub packages: Vec<Package>,
    /// Ignore patterns applied to every package
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
}

impl Config {
    pub fn new(packages: Vec<Package>) -> Self {
        Self {
            packages,
            ignore: Vec::new(),
        }
    }

    /// Read, parse and validate a config file.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self, ConfigError> {
        let content = runtime
            .read_to_string(path)
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config: Config =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate(runtime)?;
        debug!("Loaded {} package(s) from {:?}", config.packages.len(), path);
        Ok(config)
    }

    /// Check every package and make its paths absolute.
    ///
    /// `~` expands to the home directory and relative paths are resolved
    /// against the current directory. Also computes each package's merged
    /// ignore patterns.
    pub fn validate<R: Runtime>(&mut self, runtime: &R) -> Result<(), ConfigError> {
        let home = runtime.home_dir();
        let base = runtime.current_dir().map_err(ConfigError::CurrentDir)?;

        for (index, package) in self.packages.iter_mut().enumerate() {
            if package.source.as_os_str().is_empty() {
                return Err(ConfigError::MissingSource { index });
            }
            if package.targets.is_empty() {
                return Err(ConfigError::MissingTargets { index });
            }
            if package.targets.iter().any(|t| t.as_os_str().is_empty()) {
                return Err(ConfigError::EmptyTarget { index });
            }

            package.source = resolve(&package.source, &base, home.as_deref(), index)?;
            for target in package.targets.iter_mut() {
                *target = resolve(target, &base, home.as_deref(), index)?;
            }

            package.merge_ignore_patterns(&self.ignore);
        }

        Ok(())
    }

    /// Copy of the config holding only the packages that run for `environment`.
    pub fn for_environment(&self, environment: Option<&str>) -> Config {
        Config {
            packages: self
                .packages
                .iter()
                .filter(|p| p.is_in_environment(environment))
                .cloned()
                .collect(),
            ignore: self.ignore.clone(),
        }
    }

    /// Every environment named by some package, sorted and de-duplicated.
    pub fn environments(&self) -> Vec<String> {
        self.packages
            .iter()
            .flat_map(|p| p.environments.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn sources(&self) -> Vec<PathBuf> {
        self.packages.iter().map(|p| p.source.clone()).collect()
    }
}

fn resolve(path: &Path, base: &Path, home: Option<&Path>, index: usize) -> Result<PathBuf, ConfigError> {
    let expanded = expand_home(path, home).ok_or_else(|| ConfigError::NoHome {
        index,
        path: path.to_path_buf(),
    })?;
    Ok(normalize_path(&base.join(expanded)))
}
