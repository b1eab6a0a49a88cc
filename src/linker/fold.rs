//! Whether a directory is linked as a whole or walked file by file.

use log::debug;

use crate::config::Package;
use crate::pattern;

/// Decide if `dir_name`, found under `parent_relative` in the package source,
/// should be represented by a single symlink.
///
/// `no_fold` beats `fold`, which beats the package's `default_fold`. A
/// directory is also kept unfolded when a `no_fold` pattern names something
/// inside it, otherwise that exception could never be reached.
pub fn should_fold(dir_name: &str, parent_relative: &str, package: &Package) -> bool {
    let candidate = pattern::join(parent_relative, dir_name);

    if let Some(p) = package
        .no_fold
        .iter()
        .find(|p| pattern::matches(p, &candidate) || pattern::names_descendant_of(p, &candidate))
    {
        debug!("{} not folded: no_fold {:?}", candidate, p);
        return false;
    }

    if package.fold.iter().any(|p| pattern::matches(p, &candidate)) {
        return true;
    }

    package.default_fold
}
