//! Config root detection
//!
//! Decides whether an invocation targets the global OpenCode configuration
//! in the home directory or a project's `.opencode/` directory.
//!
//! ## Resolution
//!
//! 1. If the working directory is inside `~/.config/opencode` or
//!    `~/.opencode`, that directory is a global root.
//! 2. Otherwise the nearest ancestor (inclusive) holding a `.opencode/`
//!    directory is the project root.
//! 3. If no ancestor has one, the working directory itself becomes the
//!    project root, so the marker gets created there on install.

pub mod paths;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Marker directory identifying a project root
pub const MARKER_DIR: &str = ".opencode";

/// Configuration document inside the config directory
pub const CONFIG_FILE_NAME: &str = "opencode.jsonc";

/// Whether a config root is project-local or global
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigRootKind {
    Project,
    Global,
}

impl ConfigRootKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigRootKind::Project => "project",
            ConfigRootKind::Global => "global",
        }
    }
}

impl fmt::Display for ConfigRootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The directories an invocation installs into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRoot {
    pub kind: ConfigRootKind,
    /// Project root, or the global config directory itself
    pub root_dir: PathBuf,
    /// Directory holding installed items and the config document
    pub config_dir: PathBuf,
    /// Always `config_dir/opencode.jsonc`
    pub config_path: PathBuf,
}

impl ConfigRoot {
    pub fn project(root_dir: PathBuf) -> Self {
        let config_dir = root_dir.join(MARKER_DIR);
        Self::with_dirs(ConfigRootKind::Project, root_dir, config_dir)
    }

    pub fn global(config_dir: PathBuf) -> Self {
        Self::with_dirs(ConfigRootKind::Global, config_dir.clone(), config_dir)
    }

    fn with_dirs(kind: ConfigRootKind, root_dir: PathBuf, config_dir: PathBuf) -> Self {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        Self {
            kind,
            root_dir,
            config_dir,
            config_path,
        }
    }
}

/// Global configuration directories under `home_dir`, in lookup order
pub fn global_config_dirs(home_dir: &Path) -> Vec<PathBuf> {
    vec![
        home_dir.join(".config").join("opencode"),
        home_dir.join(MARKER_DIR),
    ]
}

/// Resolve the config root for `cwd`
///
/// Never fails: without a marker anywhere up the tree the project root
/// defaults to `cwd`.
pub fn resolve(cwd: &Path, home_dir: &Path) -> ConfigRoot {
    let cwd = paths::normalize_absolute(cwd);

    for global_dir in global_config_dirs(home_dir) {
        let global_dir = paths::normalize_absolute(&global_dir);
        if paths::is_inside_dir(&cwd, &global_dir) {
            debug!(dir = %global_dir.display(), "using global config root");
            return ConfigRoot::global(global_dir);
        }
    }

    let project_root = find_nearest_project_root(&cwd).unwrap_or_else(|| {
        debug!(cwd = %cwd.display(), "no {MARKER_DIR} found, defaulting to cwd");
        cwd.clone()
    });
    debug!(root = %project_root.display(), "using project config root");
    ConfigRoot::project(project_root)
}

/// Find the nearest ancestor of `start` (inclusive) that holds a marker directory
pub fn find_nearest_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(MARKER_DIR).is_dir())
        .map(Path::to_path_buf)
}

/// Home directory for global config lookup
///
/// Falls back to `cwd` when the platform reports no home directory, which
/// disables global detection rather than failing.
pub fn default_home_dir(cwd: &Path) -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| cwd.to_path_buf())
}
