//! Path pattern matching for ignore, fold and no-fold rules.
//!
//! Patterns and paths are `/`-separated and relative to a package source.
//! A path matches a pattern when:
//!
//! - they are equal,
//! - the path lies under the pattern (`nvim` matches `nvim/init.lua`),
//! - a pattern without `/` glob-matches any single segment of the path
//!   (`node_modules` matches `a/node_modules/b`),
//! - a pattern with `/` glob-matches a consecutive run of segments starting at
//!   any offset (`.config/*/cache` matches `home/.config/nvim/cache`).
//!
//! Glob syntax is that of [`glob::Pattern`] (`*`, `?`, `[...]`). A segment
//! that is not a valid glob never matches.

use glob::Pattern;

pub const SEPARATOR: char = '/';

/// Check if `path` matches `pattern`.
pub fn matches(pattern: &str, path: &str) -> bool {
    if pattern.is_empty() {
        return path.is_empty();
    }

    if pattern == path {
        return true;
    }

    if path
        .strip_prefix(pattern)
        .is_some_and(|rest| rest.starts_with(SEPARATOR))
    {
        return true;
    }

    let path_parts: Vec<&str> = path.split(SEPARATOR).collect();

    if !pattern.contains(SEPARATOR) {
        return path_parts
            .iter()
            .any(|part| segment_matches(pattern, part));
    }

    let pattern_parts: Vec<&str> = pattern.split(SEPARATOR).collect();
    if pattern_parts.len() > path_parts.len() {
        return false;
    }

    path_parts
        .windows(pattern_parts.len())
        .any(|window| segments_match(&pattern_parts, window))
}

/// Check if `pattern` names something strictly below `dir`.
///
/// The leading segments of the pattern must glob-match every segment of
/// `dir`, and the pattern must have at least one segment more. Used to keep a
/// directory from being folded when a deeper no-fold rule still needs to be
/// honored.
pub fn names_descendant_of(pattern: &str, dir: &str) -> bool {
    if pattern.is_empty() || dir.is_empty() {
        return false;
    }

    let pattern_parts: Vec<&str> = pattern.split(SEPARATOR).collect();
    let dir_parts: Vec<&str> = dir.split(SEPARATOR).collect();

    pattern_parts.len() > dir_parts.len()
        && segments_match(&pattern_parts[..dir_parts.len()], &dir_parts)
}

/// Join a relative directory and an entry name with `/`.
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}{SEPARATOR}{name}")
    }
}

fn segments_match(pattern_parts: &[&str], path_parts: &[&str]) -> bool {
    pattern_parts.len() == path_parts.len()
        && pattern_parts
            .iter()
            .zip(path_parts)
            .all(|(pattern, part)| segment_matches(pattern, part))
}

fn segment_matches(pattern: &str, segment: &str) -> bool {
    pattern == segment
        || Pattern::new(pattern)
            .map(|p| p.matches(segment))
            .unwrap_or(false)
}
