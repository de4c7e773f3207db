//! Validation of manifest-supplied paths
//!
//! Manifest paths use `/` separators. `\` is treated as a separator too so a
//! manifest cannot smuggle `..\..\` past the check on Windows.

use crate::error::{Result, install};

/// Normalize a manifest path relative to the item directory
///
/// Drops `.` and empty segments, folds `..`, and returns the result joined
/// with `/`.
///
/// # Errors
///
/// `PathTraversal` for absolute paths, paths whose `..` segments climb out
/// of the item directory, and paths that normalize to nothing.
pub fn normalize_registry_relative_path(raw: &str) -> Result<String> {
    let unified = raw.replace('\\', "/");

    if is_absolute(&unified) {
        return Err(install::path_traversal(raw, "absolute path"));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(install::path_traversal(raw, "escapes via '..'"));
                }
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(install::path_traversal(raw, "does not name a file"));
    }

    Ok(segments.join("/"))
}

/// Check that an item name is usable as a single directory name
///
/// # Errors
///
/// `PathTraversal` when the name contains a separator or is `.`/`..`.
pub fn validate_item_name(name: &str) -> Result<()> {
    if name.contains(['/', '\\']) || name == "." || name == ".." || name.trim().is_empty() {
        return Err(install::path_traversal(
            name,
            "item name must be a single path segment",
        ));
    }
    Ok(())
}

fn is_absolute(path: &str) -> bool {
    if path.starts_with('/') {
        return true;
    }
    // Windows drive prefix, e.g. `C:` or `c:/`
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
