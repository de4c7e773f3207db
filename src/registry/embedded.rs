//! Registry items compiled into the binary
//!
//! The embedded registry is closed: the set of names is fixed at build time.

use super::{DEFAULT_ENTRY, ItemKind, RegistryFile, RegistryItem};

const EMBEDDED_DESCRIPTION: &str = "Embedded ocx registry item";

struct EmbeddedItem {
    name: &'static str,
    kind: ItemKind,
    content: &'static str,
}

const EMBEDDED_ITEMS: &[EmbeddedItem] = &[EmbeddedItem {
    name: "hello",
    kind: ItemKind::Tool,
    content: include_str!("embedded/tools/hello.ts"),
}];

/// Names of all embedded items, in registry order
pub fn list_names() -> Vec<&'static str> {
    EMBEDDED_ITEMS.iter().map(|item| item.name).collect()
}

/// Look up an embedded item by spec
///
/// Any namespace prefix is ignored: `hello`, `ocx/hello` and
/// `some/ns/hello` all name the same item.
pub fn lookup(spec: &str) -> Option<RegistryItem> {
    let trimmed = spec.trim();
    let name = trimmed.rsplit('/').next().unwrap_or(trimmed);

    EMBEDDED_ITEMS
        .iter()
        .find(|item| item.name == name)
        .map(|item| RegistryItem {
            kind: item.kind,
            name: item.name.to_string(),
            description: Some(EMBEDDED_DESCRIPTION.to_string()),
            registry_dependencies: Vec::new(),
            files: vec![RegistryFile {
                path: DEFAULT_ENTRY.to_string(),
                content: item.content.to_string(),
                mode: None,
            }],
            entry: Some(DEFAULT_ENTRY.to_string()),
            postinstall: None,
        })
}
