//! Path manipulation utilities.

use std::path::{Component, Path, PathBuf};

/// Markers that identify a project root, most specific first.
pub const ROOT_MARKERS: [&str; 2] = [".xrcg", ".git"];

/// Find the project root by walking up from `start` until a directory
/// containing one of [`ROOT_MARKERS`] is found.
pub fn find_project_root(start: impl AsRef<Path>) -> Option<PathBuf> {
    let mut current = start.as_ref().to_path_buf();

    loop {
        if ROOT_MARKERS.iter().any(|m| current.join(m).exists()) {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Render a path with forward slashes, for messages that must read the same
/// on every platform.
pub fn to_unix_string(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .components()
        .map(|c| match c {
            Component::RootDir => String::new(),
            other => other.as_os_str().to_string_lossy().into_owned(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
