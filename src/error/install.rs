//! Planning and apply errors

use super::OcxError;

/// Creates a path traversal error
pub fn path_traversal(path: impl Into<String>, reason: impl Into<String>) -> OcxError {
    OcxError::PathTraversal {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a target exists error
pub fn target_exists(path: impl Into<String>) -> OcxError {
    OcxError::TargetExists { path: path.into() }
}

/// Creates a postinstall failure error
pub fn postinstall_failed(
    item: impl Into<String>,
    command: impl Into<String>,
    status: impl Into<String>,
) -> OcxError {
    OcxError::PostinstallFailed {
        item: item.into(),
        command: command.into(),
        status: status.into(),
    }
}

/// Creates an error for plans that disagree on their config root
pub fn missing_config_root(first: impl Into<String>, other: impl Into<String>) -> OcxError {
    OcxError::MissingConfigRoot {
        first: first.into(),
        other: other.into(),
    }
}

/// Creates an error for an apply call without plans
pub fn empty_plan_set() -> OcxError {
    OcxError::EmptyPlanSet
}
