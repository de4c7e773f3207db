//! Install planning
//!
//! Turns resolved items into declarative [`InstallPlan`]s. Planning does no
//! I/O; every manifest path is validated here so that a plan never names a
//! location outside its own item directory.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde_json::{Value, json};

use super::paths::{normalize_registry_relative_path, validate_item_name};
use crate::config_root::paths::normalize_absolute;
use crate::config_root::{ConfigRoot, ConfigRootKind, MARKER_DIR};
use crate::error::Result;
use crate::registry::{FileMode, ItemKind, ResolvedRegistryItem};

/// Top-level property of the config document owned by the installer
pub const MANAGED_PROPERTY: &str = "ocx";

/// Identity and locations of the item a plan installs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    pub kind: ItemKind,
    pub name: String,
    pub source: String,
    /// `config_dir/kind/name`
    pub target_dir: PathBuf,
    /// Item directory relative to the root, `/`-separated
    pub dir_rel: String,
    /// Entry file relative to the root, `/`-separated
    pub entry_rel: String,
}

impl PlannedItem {
    pub fn key(&self) -> String {
        format!("{}/{}", self.kind, self.name)
    }
}

/// A file to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWrite {
    /// Final absolute location inside the target directory
    pub path: PathBuf,
    /// Normalized path relative to the target directory
    pub relative: String,
    pub content: String,
    pub mode: Option<FileMode>,
}

/// Replacement value for one path of the config document
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEdit {
    pub json_path: Vec<String>,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPostinstall {
    pub commands: Vec<String>,
    /// Absolute working directory, rooted at the config root
    pub resolved_cwd: PathBuf,
}

/// Everything needed to install one item
#[derive(Debug, Clone, PartialEq)]
pub struct InstallPlan {
    pub config_root: ConfigRoot,
    pub item: PlannedItem,
    pub mkdirs: BTreeSet<PathBuf>,
    pub writes: Vec<PlannedWrite>,
    pub config_edits: Vec<ConfigEdit>,
    pub postinstall: Option<PlannedPostinstall>,
}

/// Plan the installation of `resolved` into `config_root`
///
/// One plan per item, in input order.
///
/// # Errors
///
/// `PathTraversal` for an item name that is not a single path segment, or a
/// file path or entry that is absolute or escapes the item directory.
pub fn plan_installs(
    resolved: &[ResolvedRegistryItem],
    config_root: &ConfigRoot,
) -> Result<Vec<InstallPlan>> {
    resolved
        .iter()
        .map(|item| plan_one(item, config_root))
        .collect()
}

fn plan_one(resolved: &ResolvedRegistryItem, config_root: &ConfigRoot) -> Result<InstallPlan> {
    let item = &resolved.item;
    validate_item_name(&item.name)?;

    let kind_dir = config_root.config_dir.join(item.kind.as_str());
    let target_dir = kind_dir.join(&item.name);

    let dir_rel = dir_rel(config_root.kind, item.kind, &item.name);
    let entry = normalize_registry_relative_path(item.entry_or_default())?;
    let entry_rel = format!("{dir_rel}/{entry}");

    let mut mkdirs = BTreeSet::from([
        config_root.config_dir.clone(),
        kind_dir,
        target_dir.clone(),
    ]);

    let mut writes = Vec::with_capacity(item.files.len());
    for file in &item.files {
        let relative = normalize_registry_relative_path(&file.path)?;
        let path = relative
            .split('/')
            .fold(target_dir.clone(), |acc, segment| acc.join(segment));
        if let Some(parent) = path.parent() {
            mkdirs.insert(parent.to_path_buf());
        }
        writes.push(PlannedWrite {
            path,
            relative,
            content: file.content.clone(),
            mode: file.mode,
        });
    }

    let postinstall = item.postinstall.as_ref().map(|p| {
        let cwd = config_root.root_dir.join(p.cwd.as_deref().unwrap_or("."));
        PlannedPostinstall {
            commands: p.commands.clone(),
            resolved_cwd: normalize_absolute(&cwd),
        }
    });

    let mut record = json!({
        "source": resolved.source,
        "dir": dir_rel,
        "entry": entry_rel,
    });
    if let (Some(p), Value::Object(map)) = (&postinstall, &mut record) {
        map.insert(
            "postinstall".to_string(),
            json!({
                "commands": p.commands,
                "cwd": p.resolved_cwd.display().to_string(),
            }),
        );
    }

    let config_edits = vec![ConfigEdit {
        json_path: vec![
            MANAGED_PROPERTY.to_string(),
            "items".to_string(),
            item.kind.as_str().to_string(),
            item.name.clone(),
        ],
        value: record,
    }];

    Ok(InstallPlan {
        config_root: config_root.clone(),
        item: PlannedItem {
            kind: item.kind,
            name: item.name.clone(),
            source: resolved.source.clone(),
            target_dir,
            dir_rel,
            entry_rel,
        },
        mkdirs,
        writes,
        config_edits,
        postinstall,
    })
}

fn dir_rel(root_kind: ConfigRootKind, kind: ItemKind, name: &str) -> String {
    match root_kind {
        ConfigRootKind::Project => format!("{MARKER_DIR}/{kind}/{name}"),
        ConfigRootKind::Global => format!("{kind}/{name}"),
    }
}
