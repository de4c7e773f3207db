//! Registry item model and manifest sources
//!
//! A registry item is a named unit of installable content (tool, agent,
//! command or theme) described by a schema version 1 JSON manifest.
//!
//! - [`validation`]: parses untyped JSON into a [`RegistryItem`]
//! - [`embedded`]: items compiled into the binary
//! - [`http`]: fetches manifests over HTTP(S)
//! - [`source`]: dispatches a spec string to the right source

pub mod embedded;
pub mod http;
pub mod source;
pub mod validation;

use std::fmt;

/// Entry file used when a manifest does not name one
pub const DEFAULT_ENTRY: &str = "index.ts";

/// Kind of registry item; also the directory it installs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKind {
    Tool,
    Agent,
    Command,
    Themes,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Tool,
        ItemKind::Agent,
        ItemKind::Command,
        ItemKind::Themes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Tool => "tool",
            ItemKind::Agent => "agent",
            ItemKind::Command => "command",
            ItemKind::Themes => "themes",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission bits a registry file may request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Regular,
    Executable,
}

impl FileMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "0644" => Some(FileMode::Regular),
            "0755" => Some(FileMode::Executable),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileMode::Regular => "0644",
            FileMode::Executable => "0755",
        }
    }

    #[cfg_attr(not(unix), allow(dead_code))]
    pub fn bits(self) -> u32 {
        match self {
            FileMode::Regular => 0o644,
            FileMode::Executable => 0o755,
        }
    }
}

/// A file shipped by a registry item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryFile {
    /// Path relative to the item directory, as written in the manifest
    pub path: String,
    pub content: String,
    pub mode: Option<FileMode>,
}

/// Commands to run after an item is installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Postinstall {
    pub commands: Vec<String>,
    /// Working directory relative to the config root
    pub cwd: Option<String>,
}

/// A validated schema version 1 registry item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryItem {
    pub kind: ItemKind,
    pub name: String,
    pub description: Option<String>,
    /// Spec strings, resolved in declared order
    pub registry_dependencies: Vec<String>,
    pub files: Vec<RegistryFile>,
    pub entry: Option<String>,
    pub postinstall: Option<Postinstall>,
}

impl RegistryItem {
    /// Identity key, `kind/name`
    pub fn key(&self) -> String {
        format!("{}/{}", self.kind, self.name)
    }

    pub fn entry_or_default(&self) -> &str {
        self.entry.as_deref().unwrap_or(DEFAULT_ENTRY)
    }
}

/// A fetched item together with where it came from
///
/// `source` is `embedded:kind/name`, the manifest URL, or the absolute path
/// of a local manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRegistryItem {
    pub item: RegistryItem,
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kind_round_trips_through_str() {
        for kind in ItemKind::ALL {
            assert_eq!(ItemKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ItemKind::parse("theme"), None);
        assert_eq!(ItemKind::parse("Tool"), None);
    }

    #[test]
    fn test_file_mode_only_accepts_canonical_strings() {
        assert_eq!(FileMode::parse("0644"), Some(FileMode::Regular));
        assert_eq!(FileMode::parse("0755"), Some(FileMode::Executable));
        assert_eq!(FileMode::parse("644"), None);
        assert_eq!(FileMode::parse("0777"), None);
        assert_eq!(FileMode::Executable.bits(), 0o755);
    }

    #[test]
    fn test_item_key_and_default_entry() {
        let item = RegistryItem {
            kind: ItemKind::Agent,
            name: "reviewer".to_string(),
            description: None,
            registry_dependencies: vec![],
            files: vec![],
            entry: None,
            postinstall: None,
        };
        assert_eq!(item.key(), "agent/reviewer");
        assert_eq!(item.entry_or_default(), "index.ts");
    }
}
