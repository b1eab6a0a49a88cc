use std::path::PathBuf;

/// Errors raised while loading, saving or inspecting the lockfile.
///
/// All of them are fatal to the invocation that hit them.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("failed to read lockfile {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to parse lockfile {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported lockfile version: {found} (expected {expected})")]
    UnsupportedVersion { found: String, expected: String },

    #[error("failed to serialize lockfile")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write lockfile {path:?}")]
    Write {
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
}
