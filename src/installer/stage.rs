//! Per-item staging
//!
//! Files are written into a temporary sibling of the target directory and
//! the whole directory is renamed into place. Both live under the kind
//! directory, so the rename never crosses a filesystem boundary.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use super::plan::{InstallPlan, PlannedWrite};
use crate::error::{Result, fs as fs_err, install};
use crate::registry::FileMode;

/// Stage `plan` and swap it onto its target directory
///
/// On any failure the staging directory is removed and the target is left
/// as it was.
///
/// # Errors
///
/// `TargetExists` when the target is present and `overwrite` is false,
/// otherwise file system errors naming the failing path.
pub fn stage_item(plan: &InstallPlan, overwrite: bool) -> Result<PathBuf> {
    let target = &plan.item.target_dir;
    let kind_dir = target
        .parent()
        .ok_or_else(|| install::path_traversal(target.display().to_string(), "has no parent"))?;
    fs::create_dir_all(kind_dir).map_err(|e| fs_err::write_error(kind_dir, &e))?;

    // Dropping `staging` removes the directory, so every `?` below cleans up
    let staging = tempfile::Builder::new()
        .prefix(&format!(".tmp-ocx-{}-", plan.item.name))
        .tempdir_in(kind_dir)
        .map_err(|e| fs_err::write_error(kind_dir, &e))?;
    debug!(item = %plan.item.key(), staging = %staging.path().display(), "staging item");

    for write in &plan.writes {
        write_staged_file(staging.path(), write)?;
    }

    if target.exists() {
        if !overwrite {
            return Err(install::target_exists(target.display().to_string()));
        }
        debug!(target = %target.display(), "removing previous install");
        fs::remove_dir_all(target).map_err(|e| fs_err::write_error(target, &e))?;
    }

    swap_into_place(staging, target)?;
    debug!(item = %plan.item.key(), target = %target.display(), "installed");
    Ok(target.clone())
}

fn write_staged_file(staging_dir: &Path, write: &PlannedWrite) -> Result<()> {
    let dest = write
        .relative
        .split('/')
        .fold(staging_dir.to_path_buf(), |acc, segment| acc.join(segment));

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| fs_err::write_error(parent, &e))?;
    }
    fs::write(&dest, &write.content).map_err(|e| fs_err::write_error(&dest, &e))?;

    match write.mode {
        Some(mode) => apply_mode(&dest, mode),
        None => Ok(()),
    }
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: FileMode) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode.bits()))
        .map_err(|e| fs_err::write_error(path, &e))
}

// Modes are recorded in the manifest only
#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: FileMode) -> Result<()> {
    Ok(())
}

fn swap_into_place(staging: TempDir, target: &Path) -> Result<()> {
    // `keep` disarms the cleanup; a failed rename still has to remove it
    let staged = staging.keep();
    if let Err(e) = fs::rename(&staged, target) {
        let _ = fs::remove_dir_all(&staged);
        return Err(fs_err::write_error(target, &e));
    }
    Ok(())
}

/// Fail with `TargetExists` for the first plan whose target is present
///
/// # Errors
///
/// `TargetExists` naming the first existing target directory.
pub fn ensure_targets_absent(plans: &[InstallPlan]) -> Result<()> {
    match plans.iter().find(|p| p.item.target_dir.exists()) {
        Some(plan) => Err(install::target_exists(
            plan.item.target_dir.display().to_string(),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcxError;
    use crate::installer::plan::plan_installs;
    use crate::registry::RegistryFile;
    use crate::test_fixtures::{create_project, resolved, tool_item};

    fn leftover_staging_dirs(kind_dir: &Path) -> Vec<String> {
        fs::read_dir(kind_dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .filter(|name| name.starts_with(".tmp-ocx-"))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_stage_fresh_item() {
        let (_temp, root) = create_project();
        let plans = plan_installs(&[resolved(tool_item("hello", &[]))], &root).unwrap();

        let dir = stage_item(&plans[0], false).unwrap();
        assert_eq!(dir, plans[0].item.target_dir);
        let content = fs::read_to_string(dir.join("index.ts")).unwrap();
        assert!(content.contains("hello"));
        assert!(leftover_staging_dirs(&root.config_dir.join("tool")).is_empty());
    }

    #[test]
    fn test_existing_target_without_overwrite() {
        let (_temp, root) = create_project();
        let plans = plan_installs(&[resolved(tool_item("hello", &[]))], &root).unwrap();
        let target = &plans[0].item.target_dir;
        fs::create_dir_all(target).unwrap();
        fs::write(target.join("mine.txt"), "keep").unwrap();

        let err = stage_item(&plans[0], false).unwrap_err();
        assert!(matches!(err, OcxError::TargetExists { .. }));
        assert_eq!(fs::read_to_string(target.join("mine.txt")).unwrap(), "keep");
        assert!(!target.join("index.ts").exists());
        assert!(leftover_staging_dirs(&root.config_dir.join("tool")).is_empty());
    }

    #[test]
    fn test_overwrite_replaces_whole_directory() {
        let (_temp, root) = create_project();
        let plans = plan_installs(&[resolved(tool_item("hello", &[]))], &root).unwrap();
        let target = &plans[0].item.target_dir;
        fs::create_dir_all(target).unwrap();
        fs::write(target.join("stale.txt"), "old").unwrap();

        stage_item(&plans[0], true).unwrap();
        assert!(target.join("index.ts").exists());
        assert!(!target.join("stale.txt").exists());
    }

    #[test]
    fn test_failing_write_leaves_no_trace() {
        let (_temp, root) = create_project();
        let mut item = tool_item("broken", &[]);
        // `a` as a file makes `a/b` impossible to create
        item.files = vec![
            RegistryFile {
                path: "a".to_string(),
                content: "file".to_string(),
                mode: None,
            },
            RegistryFile {
                path: "a/b".to_string(),
                content: "nested".to_string(),
                mode: None,
            },
        ];
        let plans = plan_installs(&[resolved(item)], &root).unwrap();

        assert!(stage_item(&plans[0], false).is_err());
        assert!(!plans[0].item.target_dir.exists());
        assert!(leftover_staging_dirs(&root.config_dir.join("tool")).is_empty());
    }

    #[test]
    fn test_failing_reinstall_keeps_previous_install() {
        let (_temp, root) = create_project();
        let good = plan_installs(&[resolved(tool_item("hello", &[]))], &root).unwrap();
        stage_item(&good[0], false).unwrap();

        let mut item = tool_item("hello", &[]);
        item.files.push(RegistryFile {
            path: "index.ts/inner".to_string(),
            content: String::new(),
            mode: None,
        });
        let bad = plan_installs(&[resolved(item)], &root).unwrap();

        assert!(stage_item(&bad[0], true).is_err());
        let target = &good[0].item.target_dir;
        assert!(target.join("index.ts").is_file());
        assert!(leftover_staging_dirs(&root.config_dir.join("tool")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_mode_applied() {
        use std::os::unix::fs::PermissionsExt;

        let (_temp, root) = create_project();
        let mut item = tool_item("runner", &[]);
        item.files.push(RegistryFile {
            path: "bin/run.sh".to_string(),
            content: "#!/bin/sh\n".to_string(),
            mode: Some(FileMode::Executable),
        });
        let plans = plan_installs(&[resolved(item)], &root).unwrap();
        let dir = stage_item(&plans[0], false).unwrap();

        let mode = fs::metadata(dir.join("bin/run.sh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_ensure_targets_absent() {
        let (_temp, root) = create_project();
        let plans = plan_installs(
            &[resolved(tool_item("a", &[])), resolved(tool_item("b", &[]))],
            &root,
        )
        .unwrap();
        assert!(ensure_targets_absent(&plans).is_ok());

        fs::create_dir_all(&plans[1].item.target_dir).unwrap();
        let err = ensure_targets_absent(&plans).unwrap_err();
        assert!(err.to_string().contains("b"));
    }
}
