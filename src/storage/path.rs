//! Path helpers for snapshot locations.

use std::fs;
use std::path::{Component, Path, PathBuf};

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~` (and all paths when no home directory can be
/// determined) are returned unchanged.
pub fn expand_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let mut components = path.components();

    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Creates every missing parent directory of `path`.
pub fn ensure_parent_dirs(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent)
        }
        _ => Ok(()),
    }
}
