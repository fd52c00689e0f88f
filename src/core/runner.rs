//! External command execution.
//!
//! [`CommandRunner`] is the seam the orchestrator executes through; tests swap
//! in a recording implementation. [`ShellRunner`] is the real one and runs each
//! command through the platform shell so `&&`, redirections and `cd` behave as
//! typed. Read-only queries that do not need a shell go through [`capture`].

use crate::core::state::CommandResult;
use std::path::Path;
use std::process::{Command, Output, Stdio};

pub trait CommandRunner {
    /// Run to completion and capture stdout and stderr together.
    ///
    /// `fallback` replaces the payload when the process could not be started
    /// or failed without printing anything.
    fn run_sync(&self, command: &str, cwd: &Path, fallback: &str) -> CommandResult;

    /// Start without waiting; output is discarded. `success` only reports
    /// whether the process was spawned.
    fn run_detached(&self, command: &str, cwd: &Path) -> CommandResult;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run_sync(&self, command: &str, cwd: &Path, fallback: &str) -> CommandResult {
        log::debug!("Running `{command}` in {}", cwd.display());

        let output = shell_command(command)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output();
        match output {
            Ok(output) => into_result(output, fallback),
            Err(e) => {
                log::warn!("Could not start `{command}`: {e}");
                CommandResult::failed("", fallback)
            }
        }
    }

    fn run_detached(&self, command: &str, cwd: &Path) -> CommandResult {
        log::debug!("Launching `{command}` in {} (detached)", cwd.display());

        let spawned = shell_command(command)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(_child) => CommandResult::succeeded(""),
            Err(e) => {
                log::warn!("Could not launch `{command}`: {e}");
                CommandResult::failed(e.to_string(), "failed to launch")
            }
        }
    }
}

/// Run `program` with `args` directly (no shell) and capture its output
pub fn capture(program: &str, args: &[&str], cwd: Option<&Path>, fallback: &str) -> CommandResult {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("GH_PROMPT_DISABLED", "1");
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    match cmd.output() {
        Ok(output) => into_result(output, fallback),
        Err(e) => {
            log::debug!("{program} unavailable: {e}");
            CommandResult::failed("", fallback)
        }
    }
}

/// Quote a value for a POSIX shell command line
pub fn shell_quote(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@=+,".contains(c))
    {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    let mut cmd = {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    };
    #[cfg(not(windows))]
    let mut cmd = {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    };
    cmd.env("GIT_TERMINAL_PROMPT", "0");
    cmd
}

fn into_result(output: Output, fallback: &str) -> CommandResult {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if output.status.success() {
        CommandResult::succeeded(combined)
    } else {
        CommandResult::failed(combined, fallback)
    }
}
