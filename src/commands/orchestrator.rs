//! Turns one user action into confirmed, executed and reconciled work.
//!
//! Every action goes through the same phases:
//!
//! ```text
//! Idle -> Prechecking -> AwaitingConfirmation -> Executing -> Reconciling -> Idle
//! ```
//!
//! A failed precheck or a declined confirmation returns to `Idle` before any
//! step runs. Steps run strictly in order and the first failure stops the
//! sequence; steps that already ran are not undone, and the returned error
//! says how many there were.
//!
//! The actions themselves live in `branch_actions` and `repo_actions`.

use crate::core::{
    config::Settings,
    error::{RepoDeckError, Result},
    gate::{ConfirmationGate, Notice, Prompter},
    git::RepoInspector,
    hosting::HostingCli,
    runner::CommandRunner,
    scan::is_repository,
    scheduler::RefreshQueue,
    state::{ActionOutcome, PendingCommand, RefreshRequest, Step},
    StatusCache,
};
use std::path::{Path, PathBuf};

/// Fallback payload when a failing step printed nothing
pub(super) const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Idle,
    Prechecking,
    AwaitingConfirmation,
    Executing,
    Reconciling,
}

/// Borrowed collaborators the orchestrator talks to
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub runner: &'a dyn CommandRunner,
    pub prompter: &'a dyn Prompter,
    pub inspector: &'a dyn RepoInspector,
    pub hosting: &'a dyn HostingCli,
}

pub struct Orchestrator<'a> {
    pub(super) base: &'a Path,
    pub(super) settings: &'a Settings,
    pub(super) cache: &'a mut StatusCache,
    pub(super) queue: &'a mut RefreshQueue,
    pub(super) services: Services<'a>,
    phase: ActionPhase,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        base: &'a Path,
        settings: &'a Settings,
        cache: &'a mut StatusCache,
        queue: &'a mut RefreshQueue,
        services: Services<'a>,
    ) -> Self {
        Self {
            base,
            settings,
            cache,
            queue,
            services,
            phase: ActionPhase::Idle,
        }
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    pub(super) fn enter(&mut self, phase: ActionPhase) {
        log::debug!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Run one action body, always ending back in `Idle`
    pub(super) fn run<F>(&mut self, action: &str, body: F) -> Result<ActionOutcome>
    where
        F: FnOnce(&mut Self) -> Result<ActionOutcome>,
    {
        log::debug!("Action {action} started");
        self.enter(ActionPhase::Prechecking);
        let outcome = body(self);
        self.enter(ActionPhase::Idle);

        match &outcome {
            Ok(ActionOutcome::Completed { summary }) => {
                log::info!("{action}: {summary}");
                self.services.prompter.notify(Notice::Success(summary.clone()));
            }
            Ok(ActionOutcome::Declined) => log::debug!("{action} declined"),
            Err(e) if e.is_precondition() => log::debug!("{action} precheck failed: {e}"),
            Err(e) => log::warn!("{action} failed: {e}"),
        }
        outcome
    }

    pub(super) fn base_dir(&self) -> Result<&'a Path> {
        if self.base.is_dir() {
            Ok(self.base)
        } else {
            Err(RepoDeckError::invalid_base_path(self.base))
        }
    }

    /// Path of the selected repository, which must still be a repository
    pub(super) fn selected(&self, name: &str) -> Result<PathBuf> {
        let base = self.base_dir()?;
        if name.trim().is_empty() {
            return Err(RepoDeckError::NoSelection);
        }
        let path = base.join(name);
        if !is_repository(&path) {
            return Err(RepoDeckError::not_a_repository(name));
        }
        Ok(path)
    }

    pub(super) fn require_login(&self) -> Result<String> {
        self.services
            .hosting
            .authenticated_user()
            .ok_or(RepoDeckError::NotAuthenticated)
    }

    pub(super) fn remote(&self) -> &'a str {
        &self.settings.default_remote
    }

    /// Ask for text; dismissed or blank input comes back as `None`
    pub(super) fn ask(&self, title: &str, prompt: &str, default: Option<&str>) -> Option<String> {
        self.services
            .prompter
            .ask_text(title, prompt, default)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }

    pub(super) fn notify(&self, notice: Notice) {
        self.services.prompter.notify(notice);
    }

    /// Show `pending` and run it if accepted. `Ok(false)` means declined.
    pub(super) fn confirm_and_execute(&mut self, title: &str, pending: &PendingCommand) -> Result<bool> {
        self.enter(ActionPhase::AwaitingConfirmation);
        if !ConfirmationGate::new(self.services.prompter).confirm_command(title, pending) {
            return Ok(false);
        }
        self.execute(pending)?;
        Ok(true)
    }

    /// Run every step in order, stopping at the first failure
    pub(super) fn execute(&mut self, pending: &PendingCommand) -> Result<()> {
        self.enter(ActionPhase::Executing);
        let total = pending.len();

        for (completed, step) in pending.steps.iter().enumerate() {
            log::debug!("Step {}/{total}: {step}", completed + 1);
            match step {
                Step::Shell(command) => {
                    let result =
                        self.services
                            .runner
                            .run_sync(command, &pending.cwd, UNKNOWN_ERROR);
                    if !result.success {
                        return Err(RepoDeckError::command_failed(
                            command.as_str(),
                            completed,
                            total,
                            result.output.trim(),
                        ));
                    }
                }
                Step::RenameDir { from, to } => std::fs::rename(from, to)
                    .map_err(|e| RepoDeckError::filesystem_step("rename", from, e))?,
                Step::RemoveDir(path) => std::fs::remove_dir_all(path)
                    .map_err(|e| RepoDeckError::filesystem_step("remove", path, e))?,
                Step::WipeWorktree(path) => wipe_worktree(path)?,
            }
        }
        Ok(())
    }

    pub(super) fn schedule(&mut self, request: RefreshRequest) {
        self.enter(ActionPhase::Reconciling);
        self.queue.schedule(request, self.settings.refresh_delay());
    }
}

/// Remove everything in `path` except `.git`
fn wipe_worktree(path: &Path) -> Result<()> {
    let entries =
        std::fs::read_dir(path).map_err(|e| RepoDeckError::filesystem_step("read", path, e))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_name() == ".git" {
            continue;
        }
        let item = entry.path();
        let removed = if entry.file_type()?.is_dir() {
            std::fs::remove_dir_all(&item)
        } else {
            std::fs::remove_file(&item)
        };
        removed.map_err(|e| RepoDeckError::filesystem_step("remove", &item, e))?;
    }
    Ok(())
}

/// A folder name the user typed; must stay a direct child of the base
pub(super) fn validate_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.starts_with('-')
        || name.chars().any(|c| c == '/' || c == '\\' || c.is_whitespace() || c.is_control());
    if invalid {
        return Err(RepoDeckError::invalid_name(name));
    }
    Ok(())
}

pub(super) fn validate_branch_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name.starts_with('-')
        || name.starts_with('/')
        || name.ends_with('/')
        || name.contains("..")
        || name.chars().any(|c| c.is_whitespace() || c.is_control() || "~^:?*[\\".contains(c));
    if invalid {
        return Err(RepoDeckError::invalid_name(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_wipe_worktree_keeps_git_dir() -> Result<()> {
        let dir = TempDir::new()?;
        std::fs::create_dir_all(dir.path().join(".git/objects"))?;
        std::fs::create_dir_all(dir.path().join("src/nested"))?;
        std::fs::write(dir.path().join("src/nested/lib.rs"), "x")?;
        std::fs::write(dir.path().join("README.md"), "x")?;
        std::fs::write(dir.path().join(".gitignore"), "target")?;

        wipe_worktree(dir.path())?;

        let remaining: Vec<_> = std::fs::read_dir(dir.path())?
            .map(|e| e.map(|e| e.file_name()))
            .collect::<std::io::Result<_>>()?;
        assert_eq!(remaining, vec![std::ffi::OsString::from(".git")]);
        assert!(dir.path().join(".git/objects").is_dir());
        Ok(())
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("alpha").is_ok());
        assert!(validate_name("feature-1.2_x").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("two words").is_err());
        assert!(validate_name("--force").is_err());
    }

    #[test]
    fn test_validate_branch_name() {
        assert!(validate_branch_name("feature/login").is_ok());
        assert!(validate_branch_name("fix-12").is_ok());
        assert!(validate_branch_name("-D").is_err());
        assert!(validate_branch_name("a..b").is_err());
        assert!(validate_branch_name("has space").is_err());
        assert!(validate_branch_name("feature/").is_err());
    }
}
