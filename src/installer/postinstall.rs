//! Postinstall command execution
//!
//! Commands run through the platform shell with inherited stdio and
//! environment, in declared order, stopping at the first failure.

use std::process::{Command, ExitStatus, Stdio};

use tracing::info;

use super::plan::PlannedPostinstall;
use crate::error::{Result, install};

/// Run every command of `postinstall` for the item `item_key`
///
/// # Errors
///
/// `PostinstallFailed` naming the first command that could not be spawned
/// or exited unsuccessfully.
pub fn run_postinstall(item_key: &str, postinstall: &PlannedPostinstall) -> Result<()> {
    for command in &postinstall.commands {
        info!(item = item_key, cwd = %postinstall.resolved_cwd.display(), "running: {command}");

        let status = shell(command)
            .current_dir(&postinstall.resolved_cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| install::postinstall_failed(item_key, command, e.to_string()))?;

        if !status.success() {
            return Err(install::postinstall_failed(
                item_key,
                command,
                describe_status(status),
            ));
        }
    }
    Ok(())
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("bash");
    cmd.arg("-lc").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {code}"),
        None => status.to_string(),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::OcxError;
    use crate::test_fixtures::create_temp_dir;

    fn postinstall(commands: &[&str], cwd: &std::path::Path) -> PlannedPostinstall {
        PlannedPostinstall {
            commands: commands.iter().map(ToString::to_string).collect(),
            resolved_cwd: cwd.to_path_buf(),
        }
    }

    #[test]
    fn test_commands_run_in_order_in_cwd() {
        let temp = create_temp_dir();
        let plan = postinstall(&["echo one > log.txt", "echo two >> log.txt"], temp.path());

        run_postinstall("tool/hello", &plan).unwrap();
        let log = std::fs::read_to_string(temp.path().join("log.txt")).unwrap();
        assert_eq!(log, "one\ntwo\n");
    }

    #[test]
    fn test_first_failure_stops_the_rest() {
        let temp = create_temp_dir();
        let plan = postinstall(&["exit 3", "touch after.txt"], temp.path());

        let err = run_postinstall("tool/hello", &plan).unwrap_err();
        match err {
            OcxError::PostinstallFailed {
                item,
                command,
                status,
            } => {
                assert_eq!(item, "tool/hello");
                assert_eq!(command, "exit 3");
                assert_eq!(status, "exit code 3");
            }
            other => panic!("expected postinstall failure, got {other:?}"),
        }
        assert!(!temp.path().join("after.txt").exists());
    }

    #[test]
    fn test_missing_cwd_fails() {
        let temp = create_temp_dir();
        let plan = postinstall(&["true"], &temp.path().join("missing"));
        assert!(matches!(
            run_postinstall("tool/hello", &plan),
            Err(OcxError::PostinstallFailed { .. })
        ));
    }
}
