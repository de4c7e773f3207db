//! Path normalization and containment checks for config root detection
//!
//! Paths are normalized lexically (made absolute, `.` dropped, `..` folded)
//! without touching the filesystem, so symlinked directories are compared
//! by the path the user typed.
//!
//! On Windows, verbatim prefixes are simplified with `dunce` and components
//! compare ASCII case-insensitively, which makes `C:\Users\Me` and
//! `c:\users\me` the same directory. Every other platform compares
//! components byte for byte.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute and fold `.` and `..` components
pub fn normalize_absolute(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let absolute = dunce::simplified(&absolute).to_path_buf();

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` refuses to remove the root, so `/..` stays `/`
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Whether `child` is `parent` itself or lives underneath it
///
/// Compares whole components, so `/home/me/.opencode-old` is not inside
/// `/home/me/.opencode`.
pub fn is_inside_dir(child: &Path, parent: &Path) -> bool {
    let child = normalize_absolute(child);
    let parent = normalize_absolute(parent);

    let mut child_components = child.components();
    for parent_component in parent.components() {
        match child_components.next() {
            Some(child_component)
                if components_equal(child_component.as_os_str(), parent_component.as_os_str()) => {}
            _ => return false,
        }
    }
    true
}

#[cfg(windows)]
fn components_equal(a: &OsStr, b: &OsStr) -> bool {
    a.to_string_lossy()
        .eq_ignore_ascii_case(&b.to_string_lossy())
}

#[cfg(not(windows))]
fn components_equal(a: &OsStr, b: &OsStr) -> bool {
    a == b
}
