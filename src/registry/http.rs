//! HTTP(S) manifest fetching

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, registry};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether a spec is an absolute HTTP or HTTPS URL
pub fn is_url(spec: &str) -> bool {
    spec.starts_with("http://") || spec.starts_with("https://")
}

/// Build the blocking client used for registry requests
pub fn build_client() -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(concat!("ocx/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| registry::fetch_failed("http client", e.to_string()))
}

/// GET `url` and decode the body as JSON
///
/// # Errors
///
/// Non-2xx responses fail with the status code in the message. Bodies that
/// are not JSON fail validation with a `$` violation.
pub fn fetch_json(client: &reqwest::blocking::Client, url: &str) -> Result<Value> {
    debug!(url, "fetching registry item");
    let response = client
        .get(url)
        .send()
        .map_err(|e| registry::fetch_failed(url, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(registry::http_status(url, status.as_u16()));
    }

    let text = response
        .text()
        .map_err(|e| registry::fetch_failed(url, e.to_string()))?;
    super::source::parse_json_document(url, &text)
}
