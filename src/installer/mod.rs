//! Planning and applying installs
//!
//! - [`plan`]: resolved items to declarative install plans (no I/O)
//! - [`paths`]: manifest path validation used while planning
//! - [`stage`]: per-item temp directory staging and atomic swap
//! - [`managed_config`]: the `ocx` section of the config document
//! - [`postinstall`]: opt-in shell commands run after the commit
//! - [`apply`]: ties staging, config merge and postinstall together

pub mod apply;
pub mod managed_config;
pub mod paths;
pub mod plan;
pub mod postinstall;
pub mod stage;

pub use apply::{ApplyOptions, ApplyOutcome, apply_install_plans};
pub use plan::{InstallPlan, plan_installs};
