//! Format-preserving edits of JSONC documents
//!
//! The installer owns a single top-level property of the user's config
//! document. Reading goes through `jsonc-parser`'s serde bridge; writing
//! edits its concrete syntax tree, so comments, trailing commas and the
//! layout of every other member survive.
//!
//! ```text
//! {
//!   // user comment survives
//!   "theme": "dark",
//!   "ocx": { ... }      <- only this value is rewritten
//! }
//! ```

use jsonc_parser::ParseOptions;
use jsonc_parser::cst::{CstInputValue, CstRootNode};
use serde_json::{Map, Value};
use thiserror::Error;

/// A document that could not be parsed or edited
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct JsoncError(String);

/// Parse a document whose top level must be an object
///
/// `Ok(None)` for a document holding only whitespace and comments.
///
/// # Errors
///
/// When the document is malformed or its top level is not an object.
pub fn parse_object(text: &str) -> Result<Option<Map<String, Value>>, JsoncError> {
    match jsonc_parser::parse_to_serde_value(text, &ParseOptions::default()) {
        Ok(None) => Ok(None),
        Ok(Some(Value::Object(object))) => Ok(Some(object)),
        Ok(Some(_)) => Err(JsoncError("top-level value is not an object".to_string())),
        Err(e) => Err(JsoncError(e.to_string())),
    }
}

/// Set top-level property `key` to `value`
///
/// An existing value is replaced in place and a missing property is
/// appended as the last member. A document holding only whitespace and
/// comments gets a new object. Line endings follow the document.
///
/// # Errors
///
/// When the document is malformed or its top level is not an object.
pub fn upsert_property(text: &str, key: &str, value: &Value) -> Result<String, JsoncError> {
    parse_object(text)?;
    let root = CstRootNode::parse(text, &ParseOptions::default())
        .map_err(|e| JsoncError(e.to_string()))?;

    let object = root.object_value_or_set();
    let value = to_input_value(value);
    match object.get(key) {
        Some(property) => {
            property.set_value(value);
        }
        None => {
            object.append(key, value);
        }
    }

    Ok(match_line_endings(text, &root.to_string()))
}

fn to_input_value(value: &Value) -> CstInputValue {
    match value {
        Value::Null => CstInputValue::Null,
        Value::Bool(b) => CstInputValue::Bool(*b),
        Value::Number(n) => CstInputValue::Number(n.to_string()),
        Value::String(s) => CstInputValue::String(s.clone()),
        Value::Array(items) => CstInputValue::Array(items.iter().map(to_input_value).collect()),
        Value::Object(members) => CstInputValue::Object(
            members
                .iter()
                .map(|(k, v)| (k.clone(), to_input_value(v)))
                .collect(),
        ),
    }
}

/// Rewrite bare `\n` in `updated` as `\r\n` when `original` uses CRLF
fn match_line_endings(original: &str, updated: &str) -> String {
    if !original.contains("\r\n") {
        return updated.to_string();
    }
    let mut out = String::with_capacity(updated.len() + 16);
    let mut previous = None;
    for c in updated.chars() {
        if c == '\n' && previous != Some('\r') {
            out.push('\r');
        }
        out.push(c);
        previous = Some(c);
    }
    out
}
