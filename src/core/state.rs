//! Data model shared by the cache, the orchestrator and the reconciler.
//!
//! # Public API
//! - [`Visibility`]: Private/public classification of a hosted repository
//! - [`RepoEntry`]: One row of the repository listing
//! - [`Step`] and [`PendingCommand`]: What an action is about to do
//! - [`CommandResult`]: Outcome of one external invocation
//! - [`RefreshRequest`]: Deferred reconciliation work
//! - [`ActionOutcome`]: What an action ended up doing
//!
//! Everything except [`Visibility`] and [`RepoEntry`] lives for a single user
//! action and is never persisted.

use crate::core::runner::shell_quote;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn from_private(is_private: bool) -> Self {
        if is_private {
            Visibility::Private
        } else {
            Visibility::Public
        }
    }

    pub fn is_private(self) -> bool {
        self == Visibility::Private
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    /// Flag accepted by `gh repo create`
    pub fn create_flag(self) -> &'static str {
        match self {
            Visibility::Public => "--public",
            Visibility::Private => "--private",
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Visibility::Public => "🌍",
            Visibility::Private => "🔒",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    pub name: String,
    pub path: PathBuf,
    pub visibility: Visibility,
}

impl RepoEntry {
    pub fn label(&self) -> String {
        format!("{} {}", self.visibility.marker(), self.name)
    }
}

/// One unit of work inside a [`PendingCommand`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Run through the shell by the command runner
    Shell(String),
    RenameDir { from: PathBuf, to: PathBuf },
    RemoveDir(PathBuf),
    /// Delete everything in a work tree except its `.git` directory
    WipeWorktree(PathBuf),
}

impl Step {
    pub fn shell(command: impl Into<String>) -> Self {
        Step::Shell(command.into())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Shell(command) => f.write_str(command),
            Step::RenameDir { from, to } => write!(
                f,
                "mv {} {}",
                shell_quote(&from.to_string_lossy()),
                shell_quote(&to.to_string_lossy())
            ),
            Step::RemoveDir(path) => write!(f, "rm -rf {}", shell_quote(&path.to_string_lossy())),
            Step::WipeWorktree(path) => write!(
                f,
                "remove everything in {} except .git",
                shell_quote(&path.to_string_lossy())
            ),
        }
    }
}

/// An ordered list of steps and the directory they run in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommand {
    pub steps: Vec<Step>,
    pub cwd: PathBuf,
}

impl PendingCommand {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            steps: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn shell(mut self, command: impl Into<String>) -> Self {
        self.steps.push(Step::shell(command));
        self
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The whole sequence as one `&&`-chained line
    pub fn command_line(&self) -> String {
        self.steps
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" && ")
    }

    pub fn shell_steps(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            Step::Shell(command) => Some(command.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub output: String,
}

impl CommandResult {
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    /// Failure payload is the captured output, or `fallback` when there was none
    pub fn failed(output: impl Into<String>, fallback: &str) -> Self {
        let output = output.into();
        let output = if output.trim().is_empty() {
            fallback.to_string()
        } else {
            output
        };
        Self {
            success: false,
            output,
        }
    }

    /// Output when the command succeeded, `fallback` otherwise
    pub fn output_or(self, fallback: &str) -> String {
        if self.success {
            self.output
        } else {
            fallback.to_string()
        }
    }
}

/// Deferred re-read of state after a command has run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshRequest {
    /// Repository whose detail view should be re-read
    pub repo: Option<PathBuf>,
    /// Newly created repository to select once it shows up
    pub select: Option<String>,
    /// Re-scan the base directory and fill cache gaps
    pub rescan: bool,
}

impl RefreshRequest {
    pub fn detail(repo: &Path) -> Self {
        Self {
            repo: Some(repo.to_path_buf()),
            ..Self::default()
        }
    }

    pub fn rescan() -> Self {
        Self {
            rescan: true,
            ..Self::default()
        }
    }

    pub fn created(base: &Path, name: &str) -> Self {
        Self {
            repo: Some(base.join(name)),
            select: Some(name.to_string()),
            rescan: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Declined or dismissed; nothing ran
    Declined,
    Completed { summary: String },
}

impl ActionOutcome {
    pub fn completed(summary: impl Into<String>) -> Self {
        ActionOutcome::Completed {
            summary: summary.into(),
        }
    }

    pub fn is_declined(&self) -> bool {
        matches!(self, ActionOutcome::Declined)
    }
}
