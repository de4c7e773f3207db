//! Schema validation for registry manifests
//!
//! [`parse_registry_item`] turns an untyped JSON document into a
//! [`RegistryItem`] or the full list of field-level violations. Nothing is
//! coerced: a field either has exactly the expected shape or it is
//! reported. Unknown fields are ignored.

use serde_json::{Map, Value};

use super::{FileMode, ItemKind, Postinstall, RegistryFile, RegistryItem};
use crate::error::FieldViolation;

/// The only manifest schema version understood
pub const SCHEMA_VERSION: u64 = 1;

type Violations = Vec<FieldViolation>;

/// Parse and validate a schema version 1 registry item
///
/// # Errors
///
/// Returns every violation found, each naming its field path.
pub fn parse_registry_item(raw: &Value) -> Result<RegistryItem, Violations> {
    let Some(object) = raw.as_object() else {
        return Err(vec![FieldViolation::new("$", "must be a JSON object")]);
    };

    let mut violations = Vec::new();

    if object.get("schemaVersion").and_then(Value::as_u64) != Some(SCHEMA_VERSION) {
        violations.push(FieldViolation::new(
            "schemaVersion",
            format!("must be {SCHEMA_VERSION} (unsupported schemaVersion)"),
        ));
    }

    let kind = parse_kind(object, &mut violations);
    let name = parse_name(object, &mut violations);
    let description = optional_string(object, "description", &mut violations);
    let registry_dependencies =
        optional_string_array(object, "registryDependencies", &mut violations);
    let files = parse_files(object, &mut violations);
    let entry = optional_string(object, "entry", &mut violations);
    let postinstall = parse_postinstall(object, &mut violations);

    match (kind, name) {
        (Some(kind), Some(name)) if violations.is_empty() => Ok(RegistryItem {
            kind,
            name,
            description,
            registry_dependencies,
            files,
            entry,
            postinstall,
        }),
        _ => Err(violations),
    }
}

fn parse_kind(object: &Map<String, Value>, violations: &mut Violations) -> Option<ItemKind> {
    let kind = object
        .get("kind")
        .and_then(Value::as_str)
        .and_then(ItemKind::parse);
    if kind.is_none() {
        violations.push(FieldViolation::new(
            "kind",
            "must be one of tool, agent, command, themes (unsupported kind)",
        ));
    }
    kind
}

fn parse_name(object: &Map<String, Value>, violations: &mut Violations) -> Option<String> {
    match object.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => Some(name.to_string()),
        _ => {
            violations.push(FieldViolation::new("name", "must be a non-empty string"));
            None
        }
    }
}

fn optional_string(
    object: &Map<String, Value>,
    field: &str,
    violations: &mut Violations,
) -> Option<String> {
    match object.get(field) {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            violations.push(FieldViolation::new(field, "must be a string"));
            None
        }
    }
}

fn optional_string_array(
    object: &Map<String, Value>,
    field: &str,
    violations: &mut Violations,
) -> Vec<String> {
    match object.get(field) {
        None => Vec::new(),
        Some(value) => string_array(value, field, violations),
    }
}

fn string_array(value: &Value, field: &str, violations: &mut Violations) -> Vec<String> {
    let Some(items) = value.as_array() else {
        violations.push(FieldViolation::new(field, "must be an array of strings"));
        return Vec::new();
    };

    let mut strings = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.as_str() {
            Some(s) => strings.push(s.to_string()),
            None => violations.push(FieldViolation::new(
                format!("{field}[{index}]"),
                "must be a string",
            )),
        }
    }
    strings
}

fn parse_files(object: &Map<String, Value>, violations: &mut Violations) -> Vec<RegistryFile> {
    let Some(files) = object.get("files").and_then(Value::as_array) else {
        violations.push(FieldViolation::new("files", "must be an array"));
        return Vec::new();
    };

    files
        .iter()
        .enumerate()
        .filter_map(|(index, file)| parse_file(file, &format!("files[{index}]"), violations))
        .collect()
}

fn parse_file(file: &Value, field: &str, violations: &mut Violations) -> Option<RegistryFile> {
    let Some(file) = file.as_object() else {
        violations.push(FieldViolation::new(field, "must be an object"));
        return None;
    };

    let path = match file.get("path").and_then(Value::as_str) {
        Some(path) if !path.is_empty() => Some(path.to_string()),
        _ => {
            violations.push(FieldViolation::new(
                format!("{field}.path"),
                "must be a non-empty string",
            ));
            None
        }
    };

    let content = if let Some(content) = file.get("content").and_then(Value::as_str) {
        Some(content.to_string())
    } else {
        violations.push(FieldViolation::new(
            format!("{field}.content"),
            "must be a string",
        ));
        None
    };

    let mode = match file.get("mode") {
        None => Ok(None),
        Some(value) => value.as_str().and_then(FileMode::parse).map(Some).ok_or(()),
    };
    if mode.is_err() {
        violations.push(FieldViolation::new(
            format!("{field}.mode"),
            "must be \"0644\" or \"0755\"",
        ));
    }

    Some(RegistryFile {
        path: path?,
        content: content?,
        mode: mode.ok()?,
    })
}

fn parse_postinstall(
    object: &Map<String, Value>,
    violations: &mut Violations,
) -> Option<Postinstall> {
    let raw = object.get("postinstall")?;
    let Some(raw) = raw.as_object() else {
        violations.push(FieldViolation::new("postinstall", "must be an object"));
        return None;
    };

    let commands = match raw.get("commands") {
        Some(value) => string_array(value, "postinstall.commands", violations),
        None => {
            violations.push(FieldViolation::new(
                "postinstall.commands",
                "must be an array of strings",
            ));
            Vec::new()
        }
    };
    let cwd = match raw.get("cwd") {
        None => None,
        Some(Value::String(cwd)) => Some(cwd.clone()),
        Some(_) => {
            violations.push(FieldViolation::new("postinstall.cwd", "must be a string"));
            None
        }
    };

    Some(Postinstall { commands, cwd })
}
