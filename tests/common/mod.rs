//! Common test utilities for ocx integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;
use walkdir::WalkDir;

/// An empty project directory next to an isolated home directory
pub struct TestProject {
    /// Keeps the scratch tree alive
    pub temp: TempDir,
    /// Project root, used as the working directory
    pub root: PathBuf,
    /// Value of `HOME` for the binary
    pub home: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().join("project");
        let home = temp.path().join("home");
        std::fs::create_dir_all(&root).expect("Failed to create project directory");
        std::fs::create_dir_all(&home).expect("Failed to create home directory");
        Self { temp, root, home }
    }

    /// The ocx binary, run from the project root with the isolated home
    pub fn cmd(&self) -> Command {
        self.cmd_in(&self.root)
    }

    /// The ocx binary, run from `dir` with the isolated home
    pub fn cmd_in(&self, dir: &Path) -> Command {
        let mut cmd = ocx_cmd();
        cmd.current_dir(dir)
            .env("HOME", &self.home)
            .env_remove("OCX_CWD")
            .env_remove("RUST_LOG");
        for proxy in ["HTTP_PROXY", "HTTPS_PROXY", "ALL_PROXY", "http_proxy", "https_proxy", "all_proxy"] {
            cmd.env_remove(proxy);
        }
        cmd
    }

    /// Write a file relative to the project root
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.root.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Write a manifest relative to the project root
    pub fn write_manifest(&self, path: &str, manifest: &Value) {
        let text = serde_json::to_string_pretty(manifest).expect("Failed to serialize manifest");
        self.write_file(path, &text);
    }

    /// Read a file relative to the project root
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.root.join(path)).expect("Failed to read file")
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.root.join(path).exists()
    }

    /// The project config document, parsed
    pub fn config(&self) -> Value {
        parse_jsonc(&self.read_file(".opencode/opencode.jsonc"))
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn ocx_cmd() -> Command {
    Command::cargo_bin("ocx").expect("Failed to find ocx binary")
}

/// Parse a JSONC config document
pub fn parse_jsonc(text: &str) -> Value {
    jsonc_parser::parse_to_serde_value(text, &jsonc_parser::ParseOptions::default())
        .expect("Failed to parse config document")
        .expect("Config document is empty")
}

/// Relative path to content for every file below `dir`
pub fn snapshot(dir: &Path) -> BTreeMap<String, String> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(dir)
                .expect("Entry outside snapshot root")
                .to_string_lossy()
                .replace('\\', "/");
            let content = std::fs::read_to_string(entry.path()).expect("Failed to read file");
            (relative, content)
        })
        .collect()
}

/// A schema version 1 tool manifest with one `index.ts`
pub fn tool_manifest(name: &str, deps: &[&str]) -> Value {
    serde_json::json!({
        "schemaVersion": 1,
        "kind": "tool",
        "name": name,
        "registryDependencies": deps,
        "files": [
            { "path": "index.ts", "content": format!("export const name = \"{name}\";\n") }
        ]
    })
}
