use std::path::{Path, PathBuf};

/// A failure on a single entry. Collected into [`super::LinkResult`] while
/// the rest of the run carries on.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("failed to read source directory {path:?}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to stat {path:?}")]
    Inspect {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("{path:?} already exists and is not a symlink")]
    Conflict { path: PathBuf },

    #[error("failed to create parent directory for {path:?}")]
    CreateParent {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to remove existing symlink {path:?}")]
    RemoveExisting {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("cannot express {original:?} relative to {target:?}")]
    RelativePath { target: PathBuf, original: PathBuf },

    #[error("failed to create symlink {target:?} -> {original:?}")]
    Create {
        target: PathBuf,
        original: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to remove symlink {path:?}")]
    Remove {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl LinkError {
    /// Path the error is about.
    pub fn path(&self) -> &Path {
        let path = match self {
            LinkError::ReadDir { path, .. }
            | LinkError::Inspect { path, .. }
            | LinkError::Conflict { path }
            | LinkError::CreateParent { path, .. }
            | LinkError::RemoveExisting { path, .. }
            | LinkError::Remove { path, .. } => path,
            LinkError::RelativePath { target, .. } | LinkError::Create { target, .. } => target,
        };
        path.as_path()
    }
}
