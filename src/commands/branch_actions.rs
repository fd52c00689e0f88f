use super::orchestrator::{validate_branch_name, Orchestrator};
use crate::core::{
    error::{RepoDeckError, Result},
    gate::Notice,
    runner::shell_quote,
    state::{ActionOutcome, PendingCommand, RefreshRequest, Step},
};
use std::path::Path;

impl<'a> Orchestrator<'a> {
    /// Stage everything, commit and push the current branch
    pub fn push(&mut self, repo: &str) -> Result<ActionOutcome> {
        self.run("push", |o| {
            o.require_login()?;
            let path = o.selected(repo)?;
            let branch = o
                .services
                .inspector
                .head(&path)
                .branch_name()
                .map(str::to_string)
                .ok_or(RepoDeckError::UnknownCurrentBranch)?;

            // an empty message skips the commit but still pushes
            let Some(message) = o.services.prompter.ask_text(
                "Save Branch",
                "Enter commit message:",
                Some(o.settings.default_commit_message.as_str()),
            ) else {
                return Ok(ActionOutcome::Declined);
            };

            let mut pending = PendingCommand::new(&path).shell("git add .");
            if !message.trim().is_empty() {
                pending = pending.shell(format!("git commit -m {}", shell_quote(message.trim())));
            }
            pending = pending.shell(format!(
                "git push -u {} {}",
                o.remote(),
                shell_quote(&branch)
            ));

            if !o.confirm_and_execute("RUN COMMANDS", &pending)? {
                return Ok(ActionOutcome::Declined);
            }
            o.schedule(RefreshRequest::detail(&path));
            Ok(ActionOutcome::completed(format!("Pushed '{branch}' of '{repo}'")))
        })
    }

    pub fn checkout(&mut self, repo: &str) -> Result<ActionOutcome> {
        self.run("checkout", |o| {
            let path = o.selected(repo)?;
            let branches = o.branches_of(&path)?;
            let current = o.services.inspector.head(&path);

            let Some(branch) =
                o.services
                    .prompter
                    .choose("Change Branch", &branches, current.branch_name())
            else {
                return Ok(ActionOutcome::Declined);
            };
            if !branches.contains(&branch) {
                return Err(RepoDeckError::unknown_branch(branch));
            }

            let pending =
                PendingCommand::new(&path).shell(format!("git checkout {}", shell_quote(&branch)));
            if !o.confirm_and_execute("RUN COMMANDS", &pending)? {
                return Ok(ActionOutcome::Declined);
            }
            o.schedule(RefreshRequest::detail(&path));
            Ok(ActionOutcome::completed(format!("Switched '{repo}' to '{branch}'")))
        })
    }

    /// Create a branch, switch to it and publish it
    pub fn new_branch(&mut self, repo: &str) -> Result<ActionOutcome> {
        self.run("new branch", |o| {
            o.require_login()?;
            let path = o.selected(repo)?;
            let Some(branch) = o.ask("New Branch", "name", None) else {
                return Ok(ActionOutcome::Declined);
            };
            validate_branch_name(&branch)?;

            let quoted = shell_quote(&branch);
            let pending = PendingCommand::new(&path)
                .shell(format!("git branch {quoted}"))
                .shell(format!("git checkout {quoted}"))
                .shell(format!("git push -u {} {quoted}", o.remote()));
            if !o.confirm_and_execute("RUN COMMANDS", &pending)? {
                return Ok(ActionOutcome::Declined);
            }
            o.schedule(RefreshRequest::detail(&path));
            Ok(ActionOutcome::completed(format!("Created branch '{branch}'")))
        })
    }

    /// Delete a branch locally and on the remote. Deleting the checked-out
    /// branch first switches to another one.
    pub fn delete_branch(&mut self, repo: &str) -> Result<ActionOutcome> {
        self.run("delete branch", |o| {
            o.require_login()?;
            let path = o.selected(repo)?;
            let branches = o.branches_of(&path)?;

            let Some(target) = o.services.prompter.choose("Drop Branch", &branches, None) else {
                return Ok(ActionOutcome::Declined);
            };
            if !branches.contains(&target) {
                return Err(RepoDeckError::unknown_branch(target));
            }

            let mut pending = PendingCommand::new(&path);
            let current = o.services.inspector.head(&path);
            if current.branch_name() == Some(target.as_str()) {
                let other = branches
                    .iter()
                    .find(|b| **b != target)
                    .ok_or_else(|| RepoDeckError::only_branch(&target))?;
                o.notify(Notice::Info(format!(
                    "Switching to '{other}' before deleting '{target}'"
                )));
                pending = pending.shell(format!("git checkout {}", shell_quote(other)));
            }

            let quoted = shell_quote(&target);
            pending = pending
                .shell(format!("git branch -D {quoted}"))
                .shell(format!("git push {} --delete {quoted}", o.remote()));
            if !o.confirm_and_execute("RUN COMMANDS", &pending)? {
                return Ok(ActionOutcome::Declined);
            }
            o.schedule(RefreshRequest::detail(&path));
            Ok(ActionOutcome::completed(format!("Deleted branch '{target}'")))
        })
    }

    /// Replace the work tree with the files of another branch. Everything
    /// except `.git` is removed first; the index is reset afterwards.
    pub fn rollback(&mut self, repo: &str) -> Result<ActionOutcome> {
        self.run("rollback", |o| {
            let path = o.selected(repo)?;
            let branches = o.branches_of(&path)?;

            let Some(branch) = o.services.prompter.choose("Fetch Branch", &branches, None) else {
                return Ok(ActionOutcome::Declined);
            };
            if !branches.contains(&branch) {
                return Err(RepoDeckError::unknown_branch(branch));
            }

            let pending = PendingCommand::new(&path)
                .step(Step::WipeWorktree(path.clone()))
                .shell(format!("git checkout {} -- .", shell_quote(&branch)))
                .shell("git reset");
            if !o.confirm_and_execute("Confirm Rollback", &pending)? {
                return Ok(ActionOutcome::Declined);
            }
            o.schedule(RefreshRequest::detail(&path));
            Ok(ActionOutcome::completed(format!(
                "Rolled back files to state of branch '{branch}'"
            )))
        })
    }

    fn branches_of(&self, path: &Path) -> Result<Vec<String>> {
        let branches = self.services.inspector.branches(path);
        if branches.is_empty() {
            return Err(RepoDeckError::NoBranches);
        }
        Ok(branches)
    }
}
