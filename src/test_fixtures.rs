//! Test fixtures and utilities for reducing test setup duplication.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{create_temp_dir, create_project, tool_item};
//!
//! #[test]
//! fn my_test() {
//!     let temp = create_temp_dir();
//!     let (temp, root) = create_project();
//!     let item = tool_item("hello", &[]);
//! }
//! ```

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

use crate::config_root::{ConfigRoot, paths::normalize_absolute};
use crate::registry::{ItemKind, RegistryFile, RegistryItem, ResolvedRegistryItem};

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("ocx-test-")
        .tempdir()
        .expect("Failed to create temp directory")
}

/// Create a nested directory structure inside a temp directory.
///
/// # Panics
///
/// Panics if the directories cannot be created.
pub fn create_nested_dir(temp: &TempDir, relative_path: &str) -> PathBuf {
    let path = temp.path().join(relative_path);
    std::fs::create_dir_all(&path).expect("Failed to create nested directory");
    path
}

/// Create an empty project and the project config root for it.
///
/// The `.opencode/` marker is not created; installing creates it.
#[must_use]
pub fn create_project() -> (TempDir, ConfigRoot) {
    let temp = create_temp_dir();
    let root = ConfigRoot::project(normalize_absolute(temp.path()));
    (temp, root)
}

/// Write a JSON manifest below `dir`, creating parent directories.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_manifest(dir: &Path, relative_path: &str, manifest: &Value) -> PathBuf {
    let path = dir.join(relative_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create manifest directory");
    }
    let text = serde_json::to_string_pretty(manifest).expect("Failed to serialize manifest");
    std::fs::write(&path, text).expect("Failed to write manifest");
    path
}

/// A tool item with a single `index.ts` and the given dependency specs.
#[must_use]
pub fn tool_item(name: &str, deps: &[&str]) -> RegistryItem {
    RegistryItem {
        kind: ItemKind::Tool,
        name: name.to_string(),
        description: None,
        registry_dependencies: deps.iter().map(ToString::to_string).collect(),
        files: vec![RegistryFile {
            path: "index.ts".to_string(),
            content: format!("export const name = \"{name}\";\n"),
            mode: None,
        }],
        entry: None,
        postinstall: None,
    }
}

/// Wrap an item as if it had been fetched from a test source.
#[must_use]
pub fn resolved(item: RegistryItem) -> ResolvedRegistryItem {
    let source = format!("test:{}", item.key());
    ResolvedRegistryItem { item, source }
}
