//! Lexical path helpers shared by config validation, the lockfile and the linker.
//!
//! Nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Normalize a path by processing `.` and `..` components lexically.
/// Symlinks are not followed.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` above the root stays put
                if !result.pop() {
                    result.push(component);
                }
            }
            _ => result.push(component),
        }
    }
    result
}

/// Check if `path` lies at or under `dir`, comparing normalized components.
///
/// `/home/user/dotfiles-old/vim` is not under `/home/user/dotfiles`.
pub fn is_path_under(path: &Path, dir: &Path) -> bool {
    let path = normalize_path(path);
    let dir = normalize_path(dir);

    let path_components: Vec<_> = path.components().collect();
    let dir_components: Vec<_> = dir.components().collect();

    path_components.len() >= dir_components.len()
        && dir_components
            .iter()
            .zip(path_components.iter())
            .all(|(d, p)| d == p)
}

/// Destination to store in a symlink at `from_link` so that it reaches `to_target`,
/// expressed relative to the link's parent directory.
///
/// For a link at `/home/user/.config/nvim` pointing to
/// `/home/user/dotfiles/nvim/.config/nvim` this returns `../dotfiles/nvim/.config/nvim`.
///
/// Returns `None` if no relative form exists (e.g., different drive letters on Windows).
pub fn relative_symlink_path(from_link: &Path, to_target: &Path) -> Option<PathBuf> {
    let from_dir = from_link.parent()?;
    let result = pathdiff::diff_paths(to_target, from_dir)?;

    if result.is_absolute() {
        return None;
    }

    Some(result)
}

/// Expand a leading `~` to `home`. Paths without one are returned unchanged.
pub fn expand_home(path: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let home = home?;
            let rest = components.as_path();
            if rest.as_os_str().is_empty() {
                Some(home.to_path_buf())
            } else {
                Some(home.join(rest))
            }
        }
        _ => Some(path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_simple() {
        assert_eq!(
            normalize_path(Path::new("/home/user/dotfiles")),
            PathBuf::from("/home/user/dotfiles")
        );
    }

    #[test]
    fn test_normalize_path_with_dot_and_parent() {
        assert_eq!(
            normalize_path(Path::new("/home/user/./dotfiles/../.config/./nvim")),
            PathBuf::from("/home/user/.config/nvim")
        );
    }

    #[test]
    fn test_normalize_path_parent_at_root() {
        #[cfg(unix)]
        assert_eq!(
            normalize_path(Path::new("/home/../../../etc")),
            PathBuf::from("/etc")
        );
    }

    #[test]
    fn test_normalize_path_relative() {
        assert_eq!(
            normalize_path(Path::new("dotfiles/zsh/../git")),
            PathBuf::from("dotfiles/git")
        );
    }

    #[test]
    fn test_normalize_path_only_dots() {
        assert_eq!(normalize_path(Path::new("./././.")), PathBuf::from(""));
    }

    #[test]
    fn test_is_path_under_nested() {
        assert!(is_path_under(
            Path::new("/home/user/dotfiles/zsh/.zshrc"),
            Path::new("/home/user/dotfiles")
        ));
    }

    #[test]
    fn test_is_path_under_same_path() {
        assert!(is_path_under(
            Path::new("/home/user/dotfiles"),
            Path::new("/home/user/dotfiles")
        ));
    }

    #[test]
    fn test_is_path_under_partial_component_match() {
        assert!(!is_path_under(
            Path::new("/home/user/dotfiles-old/zsh"),
            Path::new("/home/user/dotfiles")
        ));
    }

    #[test]
    fn test_is_path_under_traversal() {
        assert!(!is_path_under(
            Path::new("/home/user/dotfiles/../secrets/key"),
            Path::new("/home/user/dotfiles")
        ));
    }

    #[test]
    fn test_relative_symlink_path_same_parent() {
        let result = relative_symlink_path(
            Path::new("/home/user/.zshrc"),
            Path::new("/home/user/zshrc.real"),
        );
        assert_eq!(result, Some(PathBuf::from("zshrc.real")));
    }

    #[test]
    fn test_relative_symlink_path_into_package() {
        let result = relative_symlink_path(
            Path::new("/home/user/.config/nvim"),
            Path::new("/home/user/dotfiles/nvim/.config/nvim"),
        );
        assert_eq!(result, Some(PathBuf::from("../dotfiles/nvim/.config/nvim")));
    }

    #[test]
    fn test_relative_symlink_path_nested_link() {
        let result = relative_symlink_path(
            Path::new("/tmp/target/sub/b.txt"),
            Path::new("/tmp/source/sub/b.txt"),
        );
        assert_eq!(result, Some(PathBuf::from("../../source/sub/b.txt")));
    }

    #[cfg(windows)]
    #[test]
    fn test_relative_symlink_path_windows_different_drives() {
        let result = relative_symlink_path(
            Path::new("D:\\Users\\user\\.gitconfig"),
            Path::new("C:\\dotfiles\\git\\.gitconfig"),
        );
        assert_eq!(result, None);
    }

    #[test]
    fn test_expand_home_with_tilde() {
        let result = expand_home(Path::new("~/.config"), Some(Path::new("/home/user")));
        assert_eq!(result, Some(PathBuf::from("/home/user/.config")));
    }

    #[test]
    fn test_expand_home_bare_tilde() {
        let result = expand_home(Path::new("~"), Some(Path::new("/home/user")));
        assert_eq!(result, Some(PathBuf::from("/home/user")));
    }

    #[test]
    fn test_expand_home_without_tilde() {
        let result = expand_home(Path::new("/etc/xdg"), None);
        assert_eq!(result, Some(PathBuf::from("/etc/xdg")));
    }

    #[test]
    fn test_expand_home_tilde_without_home() {
        assert_eq!(expand_home(Path::new("~/.config"), None), None);
    }

    #[test]
    fn test_expand_home_tilde_inside_name() {
        let result = expand_home(Path::new("~backup/x"), Some(Path::new("/home/user")));
        assert_eq!(result, Some(PathBuf::from("~backup/x")));
    }
}
