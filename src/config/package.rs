//! A package: one source tree projected into one or more targets.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::pattern;

/// Patterns every package ignores regardless of configuration.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[".DS_Store", ".git*", "README*", "LICENSE*", "COPYING"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Package {
    /// Optional label, recorded on every link the package produces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub source: PathBuf,
    #[serde(default)]
    pub targets: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fold: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub no_fold: Vec<String>,
    #[serde(default)]
    pub default_fold: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environments: Vec<String>,

    /// Defaults, global and package ignore patterns, merged during validation.
    #[serde(skip)]
    pub(crate) ignore_patterns: Vec<String>,
}

impl Package {
    pub fn new(source: impl Into<PathBuf>, targets: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            source: source.into(),
            targets: targets.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Merged ignore patterns. Empty until the owning config is validated.
    pub fn ignore_patterns(&self) -> &[String] {
        &self.ignore_patterns
    }

    /// Check if a path relative to the package source should be skipped.
    pub fn is_ignored(&self, relative_path: &str) -> bool {
        self.ignore_patterns
            .iter()
            .any(|pattern| pattern::matches(pattern, relative_path))
    }

    pub(crate) fn merge_ignore_patterns(&mut self, global: &[String]) {
        self.ignore_patterns = DEFAULT_IGNORE_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .chain(global.iter().cloned())
            .chain(self.ignore.iter().cloned())
            .collect();
    }

    /// Whether the package takes part in a run for `environment`.
    ///
    /// Packages without environments always take part when no environment is
    /// selected, and alongside any selected environment.
    pub fn is_in_environment(&self, environment: Option<&str>) -> bool {
        match environment {
            _ if self.environments.is_empty() => true,
            None => false,
            Some(env) => self.environments.iter().any(|e| e == env),
        }
    }

    /// Label for log and error messages.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.source.display().to_string())
    }
}
