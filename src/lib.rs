pub mod commands;
pub mod config;
pub mod linker;
pub mod lockfile;
pub mod pattern;
pub mod runtime;

/// Test utilities for cross-platform path handling.
#[cfg(test)]
pub mod test_utils {
    use crate::runtime::MockRuntime;
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Returns a test home directory path based on the platform.
    /// - Unix: `/home/user`
    /// - Windows: `C:\Users\user`
    pub fn test_home() -> PathBuf {
        #[cfg(not(windows))]
        {
            PathBuf::from("/home/user")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\Users\user")
        }
    }

    /// Returns a test path outside the home directory.
    /// - Unix: `/some/other/path`
    /// - Windows: `C:\some\other\path`
    pub fn test_other_path() -> PathBuf {
        #[cfg(not(windows))]
        {
            PathBuf::from("/some/other/path")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\some\other\path")
        }
    }

    /// Configure a mock runtime with common defaults for tests.
    /// - home dir set to [`test_home`]
    /// - current_dir set to [`test_home`]
    pub fn configure_mock_runtime_basics(runtime: &mut MockRuntime) {
        runtime.expect_home_dir().returning(|| Some(test_home()));
        runtime.expect_current_dir().returning(|| Ok(test_home()));
    }

    /// Write `content` to `path`, creating parent directories.
    pub fn write_file(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Write `farm.yaml` into `dir` and return its path.
    pub fn write_config(dir: &Path, yaml: &str) -> PathBuf {
        let path = dir.join(crate::config::DEFAULT_FILE_NAME);
        write_file(&path, yaml);
        path
    }
}
