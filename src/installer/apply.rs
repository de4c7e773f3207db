//! Applying install plans
//!
//! Order of effects:
//!
//! 1. Preconditions: at least one plan, one shared config root, (without
//!    overwrite) no existing target directory, and a config document that
//!    can be edited
//! 2. Each item staged and swapped into place
//! 3. The managed config section written once, for all items
//! 4. Postinstall commands, if allowed
//!
//! Postinstall runs after the commit, so its failure leaves files and config
//! in place.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::managed_config::prepare_managed_config;
use super::plan::InstallPlan;
use super::postinstall::run_postinstall;
use super::stage::{ensure_targets_absent, stage_item};
use crate::error::{Result, fs as fs_err, install};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    pub overwrite: bool,
    pub allow_postinstall: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Installed item directories, in plan order
    pub wrote_dirs: Vec<PathBuf>,
    pub edited_config_path: PathBuf,
    /// Whether any postinstall command was run
    pub ran_postinstall: bool,
}

/// Install every plan and record it in the config document
///
/// # Errors
///
/// `EmptyPlanSet` without plans, `MissingConfigRoot` when plans target
/// different roots, `TargetExists` when a target is present and overwrite
/// is off, `ConfigParseFailed` when the config document cannot be edited
/// (checked before anything is written), `PostinstallFailed` for the first failing command, and file
/// system errors from staging or the config write.
pub fn apply_install_plans(plans: &[InstallPlan], options: ApplyOptions) -> Result<ApplyOutcome> {
    let first = plans.first().ok_or_else(install::empty_plan_set)?;
    let config_root = &first.config_root;
    if let Some(other) = plans.iter().find(|p| p.config_root != *config_root) {
        return Err(install::missing_config_root(
            config_root.config_dir.display().to_string(),
            other.config_root.config_dir.display().to_string(),
        ));
    }

    if !options.overwrite {
        ensure_targets_absent(plans)?;
    }
    let pending_config = prepare_managed_config(&config_root.config_path, plans)?;

    for plan in plans {
        for dir in plan
            .mkdirs
            .iter()
            .filter(|dir| !dir.starts_with(&plan.item.target_dir))
        {
            fs::create_dir_all(dir).map_err(|e| fs_err::write_error(dir, &e))?;
        }
    }

    let mut wrote_dirs = Vec::with_capacity(plans.len());
    for plan in plans {
        wrote_dirs.push(stage_item(plan, options.overwrite)?);
    }

    pending_config.commit()?;

    let mut ran_postinstall = false;
    if options.allow_postinstall {
        for plan in plans {
            let Some(postinstall) = &plan.postinstall else {
                continue;
            };
            ran_postinstall = true;
            run_postinstall(&plan.item.key(), postinstall)?;
        }
    } else {
        debug!("postinstall disabled");
    }

    Ok(ApplyOutcome {
        wrote_dirs,
        edited_config_path: config_root.config_path.clone(),
        ran_postinstall,
    })
}
