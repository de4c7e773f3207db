//! Configuration errors

use super::OcxError;

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> OcxError {
    OcxError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
