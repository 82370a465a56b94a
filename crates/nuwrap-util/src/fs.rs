//! Filesystem utilities for nuwrap.

use std::path::{Component, Path, PathBuf};

use crate::error::UtilError;

/// List the immediate subdirectories of `dir` in filesystem enumeration order.
///
/// The order is whatever the OS returns; it is deliberately not sorted.
/// Entries that cannot be inspected are skipped.
///
/// # Errors
/// Returns an error if `dir` cannot be read.
pub fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>, UtilError> {
    let entries = std::fs::read_dir(dir).map_err(|source| UtilError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();
        // Follow symlinks so a linked package cache still counts.
        if path.is_dir() {
            dirs.push(path);
        }
    }
    Ok(dirs)
}

/// Return the final component of `path` as UTF-8, if it has one.
pub fn dir_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Make `path` absolute against the current working directory without
/// touching the filesystem.
///
/// `.` and `..` components are folded lexically, so every ancestor of the
/// result is a real parent of the directory it names.
///
/// # Errors
/// Returns an error if the working directory cannot be determined.
pub fn absolute(path: &Path) -> Result<PathBuf, UtilError> {
    let abs = std::path::absolute(path).map_err(|source| UtilError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(normalize(&abs))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            // Popping the root is a no-op, so `/..` stays `/`.
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}

/// Case-insensitive (ASCII) check that `name` ends with `suffix`.
pub fn ends_with_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name
            .get(name.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

/// Case-insensitive (ASCII) check that `name` starts with `prefix`.
pub fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
