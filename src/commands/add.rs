//! Add command implementation
//!
//! Resolves the requested specs and their dependencies, plans every item
//! against the resolved config root, prints a summary and applies the plans.

use std::path::{Path, PathBuf};

use console::Style;
use tracing::debug;

use crate::cli::AddArgs;
use crate::config_root::{self, ConfigRoot, paths::normalize_absolute};
use crate::error::Result;
use crate::installer::{ApplyOptions, ApplyOutcome, InstallPlan, apply_install_plans, plan_installs};
use crate::progress::{ResolveProgress, TrackedSource};
use crate::registry::source::RegistrySource;
use crate::resolver::resolve_registry_tree;

/// Run add command
pub fn run(args: AddArgs) -> Result<()> {
    let cwd = working_dir(args.cwd.as_deref())?;
    let home = config_root::default_home_dir(&cwd);
    let root = config_root::resolve(&cwd, &home);
    debug!(cwd = %cwd.display(), root = %root.config_dir.display(), kind = %root.kind, "config root");

    let source = RegistrySource::new(&cwd);
    let progress = ResolveProgress::new();
    let resolved = match resolve_registry_tree(&args.specs, &TrackedSource::new(&source, &progress)) {
        Ok(resolved) => {
            progress.finish();
            resolved
        }
        Err(e) => {
            progress.abandon();
            return Err(e);
        }
    };

    let plans = plan_installs(&resolved, &root)?;
    print_summary(&root, &plans, &args);
    print_postinstall_preview(&plans, args.allow_postinstall);

    if args.dry_run {
        print_planned_writes(&plans);
        return Ok(());
    }

    let outcome = apply_install_plans(
        &plans,
        ApplyOptions {
            overwrite: args.overwrite,
            allow_postinstall: args.allow_postinstall,
        },
    )?;
    print_outcome(&outcome);
    Ok(())
}

fn working_dir(cwd: Option<&Path>) -> Result<PathBuf> {
    let dir = match cwd {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    Ok(normalize_absolute(&dir))
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn print_summary(root: &ConfigRoot, plans: &[InstallPlan], args: &AddArgs) {
    let bold = Style::new().bold();
    let file_count: usize = plans.iter().map(|p| p.writes.len()).sum();

    println!(
        "{} {} ({})",
        bold.apply_to("Install root:"),
        root.config_dir.display(),
        root.kind
    );
    println!("{} {}", bold.apply_to("Config:"), root.config_path.display());
    println!("{} {}", bold.apply_to("Files:"), file_count);
    println!("{} {}", bold.apply_to("Overwrite:"), yes_no(args.overwrite));
    println!(
        "{} {}",
        bold.apply_to("Postinstall:"),
        yes_no(args.allow_postinstall)
    );
    println!("{} ({}):", bold.apply_to("Items"), plans.len());
    for plan in plans {
        println!(
            "  {} {}",
            Style::new().yellow().apply_to(plan.item.key()),
            Style::new().dim().apply_to(format!("({})", plan.item.source))
        );
    }
}

fn print_postinstall_preview(plans: &[InstallPlan], allowed: bool) {
    let with_postinstall: Vec<_> = plans
        .iter()
        .filter_map(|p| p.postinstall.as_ref().map(|post| (p, post)))
        .filter(|(_, post)| !post.commands.is_empty())
        .collect();
    if with_postinstall.is_empty() {
        return;
    }

    println!();
    println!("{}", Style::new().bold().apply_to("Postinstall commands:"));
    for (plan, postinstall) in &with_postinstall {
        println!(
            "  {} {}",
            Style::new().yellow().apply_to(plan.item.key()),
            Style::new()
                .dim()
                .apply_to(format!("(in {})", postinstall.resolved_cwd.display()))
        );
        for command in &postinstall.commands {
            println!("    $ {command}");
        }
    }
    if !allowed {
        println!(
            "{}",
            Style::new()
                .cyan()
                .apply_to("Postinstall commands were not run. Re-run with --allow-postinstall to run them.")
        );
    }
}

fn print_planned_writes(plans: &[InstallPlan]) {
    println!();
    println!("{}", Style::new().bold().apply_to("Planned writes:"));
    for plan in plans {
        for write in &plan.writes {
            println!("  {}", write.path.display());
        }
    }
    println!();
    println!("Dry run: nothing was written.");
}

fn print_outcome(outcome: &ApplyOutcome) {
    println!();
    println!(
        "{} {} item(s)",
        Style::new().green().bold().apply_to("Installed"),
        outcome.wrote_dirs.len()
    );
    for dir in &outcome.wrote_dirs {
        println!("  {}", dir.display());
    }
    println!(
        "{} {}",
        Style::new().bold().apply_to("Updated config:"),
        outcome.edited_config_path.display()
    );
    println!(
        "{} {}",
        Style::new().bold().apply_to("Ran postinstall:"),
        yes_no(outcome.ran_postinstall)
    );
}
