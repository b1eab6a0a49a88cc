use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::config::Config;
use crate::linker::LinkResult;
use crate::runtime::Runtime;

mod link;
pub mod paths;
mod status;
mod unlink;

pub use link::link;
pub use status::status;
pub use unlink::unlink;

/// Flags shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub config: Option<PathBuf>,
    pub lockfile: Option<PathBuf>,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Options {
    pub(crate) fn config_path<R: Runtime>(&self, runtime: &R) -> Result<PathBuf> {
        paths::config_path(runtime, self.config.as_deref())
    }

    pub(crate) fn lockfile_path<R: Runtime>(&self, runtime: &R) -> Result<PathBuf> {
        paths::lockfile_path(runtime, self.lockfile.as_deref())
    }
}

/// Load the config and narrow it to the packages of `environment`.
///
/// Returns `None`, after listing the known environments, when a named
/// environment selects no package at all.
fn load_config<R: Runtime>(
    runtime: &R,
    options: &Options,
    environment: Option<&str>,
) -> Result<Option<Config>> {
    let path = options.config_path(runtime)?;
    let config = Config::load(runtime, &path).context("Failed to load config")?;
    let selected = config.for_environment(environment);

    debug!(
        "{} of {} package(s) selected",
        selected.packages.len(),
        config.packages.len()
    );

    if let Some(env) = environment
        && selected.packages.is_empty()
    {
        println!("No packages found for environment '{}'", env);
        let available = config.environments();
        if !available.is_empty() {
            println!("Available environments: {}", available.join(", "));
        }
        return Ok(None);
    }

    Ok(Some(selected))
}

fn environment_suffix(environment: Option<&str>) -> String {
    environment
        .map(|env| format!(" for environment '{}'", env))
        .unwrap_or_default()
}

/// Print every error with its causes and fail if there were any.
fn report_errors(result: LinkResult, action: &str) -> Result<()> {
    if !result.has_errors() {
        return Ok(());
    }

    let count = result.errors.len();
    eprintln!("\nErrors:");
    for error in result.errors {
        eprintln!("  ✗ {:#}", anyhow::Error::from(error));
    }
    anyhow::bail!("{} completed with {} errors", action, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linker::LinkError;
    use crate::runtime::RealRuntime;
    use crate::test_utils::write_config;
    use tempfile::tempdir;

    #[test]
    fn test_environment_suffix() {
        assert_eq!(environment_suffix(None), "");
        assert_eq!(environment_suffix(Some("work")), " for environment 'work'");
    }

    #[test]
    fn test_link_error_chain_formatting() {
        let error = LinkError::Remove {
            path: PathBuf::from("/home/user/.zshrc"),
            source: anyhow::anyhow!("permission denied"),
        };
        assert_eq!(
            format!("{:#}", anyhow::Error::from(error)),
            "failed to remove symlink \"/home/user/.zshrc\": permission denied"
        );
    }

    #[test]
    fn test_report_errors() {
        assert!(report_errors(LinkResult::default(), "linking").is_ok());

        let result = LinkResult {
            errors: vec![LinkError::Conflict {
                path: PathBuf::from("/home/user/.zshrc"),
            }],
            ..LinkResult::default()
        };
        let err = report_errors(result, "linking").unwrap_err();
        assert_eq!(err.to_string(), "linking completed with 1 errors");
    }

    #[test]
    fn test_load_config_unknown_environment() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            &format!(
                "packages:\n  - source: {src:?}\n    targets: [{dst:?}]\n    environments: [work]\n",
                src = dir.path().join("src"),
                dst = dir.path().join("dst"),
            ),
        );
        let options = Options {
            config: Some(path),
            ..Options::default()
        };

        let selected = load_config(&RealRuntime, &options, Some("home")).unwrap();
        assert!(selected.is_none());

        let selected = load_config(&RealRuntime, &options, Some("work")).unwrap().unwrap();
        assert_eq!(selected.packages.len(), 1);

        // no environment selects nothing here, but that is not an error
        let selected = load_config(&RealRuntime, &options, None).unwrap().unwrap();
        assert!(selected.packages.is_empty());
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempdir().unwrap();
        let options = Options {
            config: Some(dir.path().join("farm.yaml")),
            ..Options::default()
        };
        let err = load_config(&RealRuntime, &options, None).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }
}
