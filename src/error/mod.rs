//! Error types and handling for ocx
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`registry`]: Spec parsing, manifest fetching and validation errors
//! - [`deps`]: Dependency resolution errors
//! - [`install`]: Planning and apply errors
//! - [`config`]: Configuration document errors
//! - [`fs`]: File system errors

pub mod config;
pub mod deps;
pub mod fs;
pub mod install;
pub mod registry;

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// A single schema violation found while validating a registry manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Field path, e.g. `files[2].mode` or `$` for the document itself
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Main error type for ocx operations
#[derive(Error, Diagnostic, Debug)]
pub enum OcxError {
    // Spec and manifest errors
    #[error("Missing registry item spec")]
    #[diagnostic(
        code(ocx::spec::invalid),
        help("Pass an embedded item name, a URL, or a path to a .json manifest")
    )]
    InvalidSpec { spec: String },

    #[error("Unknown registry spec: {spec} (try embedded item, URL, or path to .json)")]
    #[diagnostic(
        code(ocx::spec::not_found),
        help("Run 'ocx list' to see the embedded items")
    )]
    NotFound { spec: String },

    #[error("Failed to fetch registry item: {url} ({reason})")]
    #[diagnostic(code(ocx::registry::fetch_failed))]
    FetchFailed { url: String, reason: String },

    #[error("Invalid registry item {origin}: {}", join_violations(.violations))]
    #[diagnostic(code(ocx::registry::validation_failed))]
    ValidationFailed {
        origin: String,
        violations: Vec<FieldViolation>,
    },

    // Dependency errors
    #[error("Registry dependency cycle detected at {key} ({chain})")]
    #[diagnostic(
        code(ocx::deps::cyclic),
        help("Remove one of the registryDependencies entries that closes the cycle")
    )]
    CyclicDependency { key: String, chain: String },

    // Install errors
    #[error("Refusing path outside the item directory: {path} ({reason})")]
    #[diagnostic(
        code(ocx::install::path_traversal),
        help("Registry file paths must be relative and stay inside the item directory")
    )]
    PathTraversal { path: String, reason: String },

    #[error("Target already exists: {path} (use --overwrite)")]
    #[diagnostic(
        code(ocx::install::target_exists),
        help("Re-run with --overwrite to replace the installed item")
    )]
    TargetExists { path: String },

    #[error("Postinstall command failed ({status}) for {item}: {command}")]
    #[diagnostic(
        code(ocx::install::postinstall_failed),
        help("Files and config were already written; fix the command and re-run it by hand")
    )]
    PostinstallFailed {
        item: String,
        command: String,
        status: String,
    },

    #[error("No install plans to apply")]
    #[diagnostic(code(ocx::install::empty_plan_set))]
    EmptyPlanSet,

    #[error("Missing config root: install plans target {first} and {other}")]
    #[diagnostic(code(ocx::install::missing_config_root))]
    MissingConfigRoot { first: String, other: String },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(
        code(ocx::config::parse_failed),
        help("The configuration document must be a JSON object (comments are allowed)")
    )]
    ConfigParseFailed { path: String, reason: String },

    // CLI errors
    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(ocx::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { shell: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(ocx::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(ocx::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(ocx::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for OcxError {
    fn from(err: std::io::Error) -> Self {
        OcxError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, OcxError>;
