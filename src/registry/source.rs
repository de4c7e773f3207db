//! Spec dispatch: turn a spec string into a validated registry item
//!
//! Specs are tried in priority order:
//!
//! 1. Embedded item, by trailing path segment
//! 2. `http://` or `https://` URL
//! 3. Local manifest: starts with `/`, `./`, `../` or ends in `.json`,
//!    resolved against the working directory
//!
//! Anything else is unknown.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde_json::Value;
use tracing::debug;

use super::{ResolvedRegistryItem, embedded, http, validation};
use crate::config_root::paths::normalize_absolute;
use crate::error::{FieldViolation, Result, fs, registry};

/// Something that can fetch a registry item for a spec
pub trait ManifestSource {
    /// Fetch and validate the item named by `spec`
    fn fetch(&self, spec: &str) -> Result<ResolvedRegistryItem>;
}

/// Manifest source backed by the embedded registry, HTTP and the filesystem
pub struct RegistrySource {
    cwd: PathBuf,
    client: OnceLock<reqwest::blocking::Client>,
}

impl RegistrySource {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> Result<&reqwest::blocking::Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = http::build_client()?;
        Ok(self.client.get_or_init(|| client))
    }

    fn fetch_url(&self, url: &str) -> Result<ResolvedRegistryItem> {
        let raw = http::fetch_json(self.client()?, url)?;
        validate(url, &raw)
    }

    fn fetch_file(&self, spec: &str) -> Result<ResolvedRegistryItem> {
        let path = Path::new(spec);
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            normalize_absolute(&self.cwd.join(path))
        };
        debug!(path = %resolved.display(), "reading registry item");

        let text = std::fs::read_to_string(&resolved).map_err(|e| fs::read_error(&resolved, &e))?;
        let origin = resolved.display().to_string();
        let raw = parse_json_document(&origin, &text)?;
        validate(&origin, &raw)
    }
}

impl ManifestSource for RegistrySource {
    fn fetch(&self, spec: &str) -> Result<ResolvedRegistryItem> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return Err(registry::invalid_spec(spec));
        }

        if let Some(item) = embedded::lookup(trimmed) {
            let source = format!("embedded:{}", item.key());
            debug!(spec = trimmed, %source, "resolved embedded item");
            return Ok(ResolvedRegistryItem { item, source });
        }

        if http::is_url(trimmed) {
            return self.fetch_url(trimmed);
        }

        if looks_like_file_path(trimmed) {
            return self.fetch_file(trimmed);
        }

        Err(registry::not_found(trimmed))
    }
}

/// Whether a spec should be read from the filesystem
pub fn looks_like_file_path(spec: &str) -> bool {
    spec.starts_with('/')
        || spec.starts_with("./")
        || spec.starts_with("../")
        || spec.ends_with(".json")
}

/// Parse manifest text, reporting malformed JSON as a validation failure
pub(crate) fn parse_json_document(origin: &str, text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| {
        registry::validation_failed(
            origin,
            vec![FieldViolation::new("$", format!("is not valid JSON ({e})"))],
        )
    })
}

fn validate(origin: &str, raw: &Value) -> Result<ResolvedRegistryItem> {
    let item = validation::parse_registry_item(raw)
        .map_err(|violations| registry::validation_failed(origin, violations))?;
    Ok(ResolvedRegistryItem {
        item,
        source: origin.to_string(),
    })
}
