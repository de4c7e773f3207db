//! The installer-owned `ocx` section of the config document
//!
//! The section is read tolerantly (anything malformed is discarded) and each
//! planned record replaces the previous one wholesale. The updated document
//! is computed before any item is installed, so a config that cannot be
//! edited stops the install early, and is written with an atomic temp-file
//! rename once every item is in place.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::plan::{InstallPlan, MANAGED_PROPERTY};
use crate::error::{Result, config, fs as fs_err};
use crate::jsonc;
use crate::registry::ItemKind;

type Records = Map<String, Value>;

/// Managed section as persisted: `{"items": {kind: {name: record}}}`
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ManagedSection {
    pub items: ManagedItems,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ManagedItems {
    pub tool: Records,
    pub agent: Records,
    pub command: Records,
    pub themes: Records,
}

impl ManagedItems {
    fn records_mut(&mut self, kind: ItemKind) -> &mut Records {
        match kind {
            ItemKind::Tool => &mut self.tool,
            ItemKind::Agent => &mut self.agent,
            ItemKind::Command => &mut self.command,
            ItemKind::Themes => &mut self.themes,
        }
    }
}

impl ManagedSection {
    /// Extract the section from a parsed config document, discarding
    /// whatever does not have the expected shape
    pub fn from_document(document: Option<&Map<String, Value>>) -> Self {
        let mut section = Self::default();
        let Some(raw) = document.and_then(|doc| doc.get(MANAGED_PROPERTY)) else {
            return section;
        };
        let Some(items) = raw.get("items").and_then(Value::as_object) else {
            warn!("discarding '{MANAGED_PROPERTY}' section without an items object");
            return section;
        };

        for kind in ItemKind::ALL {
            match items.get(kind.as_str()) {
                Some(Value::Object(records)) => *section.items.records_mut(kind) = records.clone(),
                Some(_) => warn!(kind = %kind, "discarding malformed installed-item records"),
                None => {}
            }
        }
        section
    }

    /// Apply the config edits of `plan`
    fn apply(&mut self, plan: &InstallPlan) {
        for edit in &plan.config_edits {
            match edit.json_path.as_slice() {
                [property, items, kind, name] if property == MANAGED_PROPERTY && items == "items" => {
                    if let Some(kind) = ItemKind::parse(kind) {
                        self.items
                            .records_mut(kind)
                            .insert(name.clone(), edit.value.clone());
                        continue;
                    }
                    warn!(path = ?edit.json_path, "ignoring config edit for unknown kind");
                }
                _ => warn!(path = ?edit.json_path, "ignoring config edit outside the managed section"),
            }
        }
    }
}

/// An updated config document waiting to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfig {
    path: PathBuf,
    text: String,
}

impl PendingConfig {
    /// Write the document atomically
    pub fn commit(self) -> Result<()> {
        write_atomic(&self.path, &self.text)?;
        debug!(path = %self.path.display(), "updated config");
        Ok(())
    }
}

/// Compute the config document at `config_path` with the records of `plans`
/// merged in, without writing it
///
/// A missing or unreadable document is treated as empty.
///
/// # Errors
///
/// `ConfigParseFailed` when the existing document is malformed or not an
/// object.
pub fn prepare_managed_config(config_path: &Path, plans: &[InstallPlan]) -> Result<PendingConfig> {
    let parse_failed = |e: &dyn std::fmt::Display| {
        config::parse_failed(config_path.display().to_string(), e.to_string())
    };

    let existing = read_document(config_path);
    let document = jsonc::parse_object(&existing).map_err(|e| parse_failed(&e))?;

    let mut section = ManagedSection::from_document(document.as_ref());
    for plan in plans {
        section.apply(plan);
    }

    let value = serde_json::to_value(&section).map_err(|e| parse_failed(&e))?;
    let text = jsonc::upsert_property(&existing, MANAGED_PROPERTY, &value)
        .map_err(|e| parse_failed(&e))?;
    debug!(path = %config_path.display(), items = plans.len(), "prepared config update");

    Ok(PendingConfig {
        path: config_path.to_path_buf(),
        text,
    })
}

fn read_document(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => {
            warn!(path = %path.display(), "treating unreadable config as empty: {e}");
            String::new()
        }
    }
}

/// Write `content` next to `path` and rename it over `path`
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| fs_err::write_error(dir, &e))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".tmp-ocx-config-")
        .tempfile_in(dir)
        .map_err(|e| fs_err::write_error(dir, &e))?;
    temp.write_all(content.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| fs_err::write_error(temp.path(), &e))?;
    temp.persist(path)
        .map_err(|e| fs_err::write_error(path, &e.error))?;
    Ok(())
}
