//! Spec, fetch and manifest validation errors

use super::{FieldViolation, OcxError};

/// Creates an invalid (empty) spec error
pub fn invalid_spec(spec: impl Into<String>) -> OcxError {
    OcxError::InvalidSpec { spec: spec.into() }
}

/// Creates an unknown spec error
pub fn not_found(spec: impl Into<String>) -> OcxError {
    OcxError::NotFound { spec: spec.into() }
}

/// Creates a fetch error for a transport failure
pub fn fetch_failed(url: impl Into<String>, reason: impl Into<String>) -> OcxError {
    OcxError::FetchFailed {
        url: url.into(),
        reason: reason.into(),
    }
}

/// Creates a fetch error for a non-2xx response
pub fn http_status(url: impl Into<String>, status: u16) -> OcxError {
    fetch_failed(url, format!("HTTP {status}"))
}

/// Creates a manifest validation error
pub fn validation_failed(origin: impl Into<String>, violations: Vec<FieldViolation>) -> OcxError {
    OcxError::ValidationFailed {
        origin: origin.into(),
        violations,
    }
}
