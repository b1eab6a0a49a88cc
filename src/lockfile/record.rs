//! A single tracked symlink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lockfile entry for a symlink created by farm.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinkRecord {
    /// Absolute path the symlink should resolve to
    pub source: PathBuf,
    /// Absolute path of the symlink itself
    pub target: PathBuf,
    pub created: DateTime<Utc>,
    /// Whether the link stands in for a whole directory
    #[serde(default)]
    pub is_folded: bool,
    /// Name of the package that produced the link, when it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl LinkRecord {
    pub fn new(target: PathBuf, source: PathBuf, is_folded: bool) -> Self {
        Self {
            source,
            target,
            created: Utc::now(),
            is_folded,
            package: None,
        }
    }

    pub fn with_package(mut self, package: Option<String>) -> Self {
        self.package = package;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_record_serialize_without_package() {
        let record = LinkRecord::new(
            PathBuf::from("/home/user/.zshrc"),
            PathBuf::from("/home/user/dotfiles/zsh/.zshrc"),
            false,
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""source":"/home/user/dotfiles/zsh/.zshrc""#));
        assert!(json.contains(r#""target":"/home/user/.zshrc""#));
        assert!(json.contains(r#""is_folded":false"#));
        assert!(!json.contains("package")); // skip_serializing_if
    }

    #[test]
    fn test_link_record_deserialize() {
        let json = r#"{
            "source": "/home/user/dotfiles/nvim/.config/nvim",
            "target": "/home/user/.config/nvim",
            "created": "2024-05-01T12:30:00Z",
            "is_folded": true,
            "package": "nvim"
        }"#;
        let record: LinkRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.target, PathBuf::from("/home/user/.config/nvim"));
        assert!(record.is_folded);
        assert_eq!(record.package.as_deref(), Some("nvim"));
        assert_eq!(record.created.to_rfc3339(), "2024-05-01T12:30:00+00:00");
    }

    #[test]
    fn test_link_record_deserialize_minimal() {
        let json = r#"{
            "source": "/s",
            "target": "/t",
            "created": "2024-05-01T12:30:00Z"
        }"#;
        let record: LinkRecord = serde_json::from_str(json).unwrap();
        assert!(!record.is_folded);
        assert_eq!(record.package, None);
    }
}
