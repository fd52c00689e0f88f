use super::orchestrator::{validate_name, ActionPhase, Orchestrator};
use crate::core::{
    error::{RepoDeckError, Result},
    gate::{format_steps, ConfirmationGate},
    git::github_slug,
    runner::shell_quote,
    state::{ActionOutcome, PendingCommand, RefreshRequest, Step, Visibility},
};
use std::path::Path;

fn quote_path(path: &Path) -> String {
    shell_quote(&path.to_string_lossy())
}

/// `feature/x` becomes `feature_x` so it can sit in a single file name
fn file_safe(branch: &str) -> String {
    branch.replace(['/', '\\'], "_")
}

impl<'a> Orchestrator<'a> {
    /// `git init` a new folder under the base directory
    pub fn init(&mut self) -> Result<ActionOutcome> {
        self.run("init", |o| {
            let base = o.base_dir()?;
            let Some(name) = o.ask("Git Init", "Enter folder name:", None) else {
                return Ok(ActionOutcome::Declined);
            };
            validate_name(&name)?;
            let path = base.join(&name);
            if path.exists() {
                return Err(RepoDeckError::name_collision(name));
            }

            let pending = PendingCommand::new(base).shell(format!("git init {}", quote_path(&path)));
            if !o.confirm_and_execute("RUN COMMANDS", &pending)? {
                return Ok(ActionOutcome::Declined);
            }
            o.schedule(RefreshRequest::rescan());
            Ok(ActionOutcome::completed(format!("Initialized '{name}'")))
        })
    }

    /// New local repository with a matching GitHub repository
    pub fn create_repo(&mut self) -> Result<ActionOutcome> {
        self.run("create repo", |o| {
            let user = o.require_login()?;
            let base = o.base_dir()?;
            let Some(name) = o.ask("New Repo", "Enter repository name:", None) else {
                return Ok(ActionOutcome::Declined);
            };
            validate_name(&name)?;
            let path = base.join(&name);
            if path.exists() {
                return Err(RepoDeckError::name_collision(name));
            }
            let visibility =
                Visibility::from_private(o.services.prompter.confirm("New Repo", "Private?"));

            let pending = PendingCommand::new(base)
                .shell(format!("git init {}", quote_path(&path)))
                .shell(format!(
                    "gh repo create {} {} --source={} --remote=origin",
                    shell_quote(&format!("{user}/{name}")),
                    visibility.create_flag(),
                    quote_path(&path)
                ));
            if !o.confirm_and_execute("RUN COMMANDS", &pending)? {
                return Ok(ActionOutcome::Declined);
            }

            o.cache.upsert(&path, visibility.is_private())?;
            o.schedule(RefreshRequest::created(base, &name));
            Ok(ActionOutcome::completed(format!(
                "Created {visibility} repository '{name}'"
            )))
        })
    }

    pub fn clone_repo(&mut self) -> Result<ActionOutcome> {
        self.run("clone", |o| {
            let base = o.base_dir()?;
            let Some(url) = o.ask("Clone", "GitHub URL:", None) else {
                return Ok(ActionOutcome::Declined);
            };
            let name = clone_target(&url).ok_or_else(|| RepoDeckError::invalid_name(&url))?;
            validate_name(&name)?;
            let path = base.join(&name);
            if path.exists() {
                return Err(RepoDeckError::name_collision(name));
            }

            let pending = PendingCommand::new(base).shell(format!("git clone {}", shell_quote(&url)));
            if !o.confirm_and_execute("RUN COMMANDS", &pending)? {
                return Ok(ActionOutcome::Declined);
            }

            if path.is_dir() {
                let is_private = o.services.hosting.is_private(&path);
                o.cache.upsert(&path, is_private)?;
            }
            o.schedule(RefreshRequest::created(base, &name));
            Ok(ActionOutcome::completed(format!("Cloned '{name}'")))
        })
    }

    /// Rename the folder and the GitHub repository. The cache follows the
    /// folder even when the remote rename fails afterwards.
    pub fn rename(&mut self, repo: &str) -> Result<ActionOutcome> {
        self.run("rename", |o| {
            let user = o.require_login()?;
            let old_path = o.selected(repo)?;
            let base = o.base_dir()?;
            let slug = o
                .services
                .inspector
                .remote_url(&old_path, o.remote())
                .and_then(|url| github_slug(&url))
                .unwrap_or_else(|| format!("{user}/{repo}"));

            let new_name = match o.ask("Rename Repo", "Enter new name:", Some(repo)) {
                Some(new_name) if new_name != repo => new_name,
                _ => return Ok(ActionOutcome::Declined),
            };
            validate_name(&new_name)?;
            let new_path = base.join(&new_name);
            if new_path.exists() {
                return Err(RepoDeckError::name_collision(new_name));
            }

            let pending = PendingCommand::new(base)
                .step(Step::RenameDir {
                    from: old_path.clone(),
                    to: new_path.clone(),
                })
                .shell(format!(
                    "gh repo rename {} --repo {} --yes",
                    shell_quote(&new_name),
                    shell_quote(&slug)
                ));

            o.enter(ActionPhase::AwaitingConfirmation);
            if !ConfirmationGate::new(o.services.prompter).confirm_command("RUN COMMANDS", &pending) {
                return Ok(ActionOutcome::Declined);
            }
            let executed = o.execute(&pending);

            if new_path.is_dir() && !old_path.exists() {
                let is_private = o.cache.rename(&old_path, &new_path)?;
                log::debug!("Cache entry moved to {} (private: {is_private})", new_path.display());
            }
            executed?;

            o.schedule(RefreshRequest::created(base, &new_name));
            Ok(ActionOutcome::completed(format!("Renamed '{repo}' to '{new_name}'")))
        })
    }

    /// Delete the GitHub repository and the local folder. Needs a yes and
    /// the typed phrase `delete <name>`.
    pub fn delete(&mut self, repo: &str) -> Result<ActionOutcome> {
        self.run("delete", |o| {
            o.require_login()?;
            let path = o.selected(repo)?;
            let base = o.base_dir()?;
            let remote = o.remote();
            let url = o
                .services
                .inspector
                .remote_url(&path, remote)
                .ok_or_else(|| RepoDeckError::unknown_remote(remote))?;
            let slug = github_slug(&url).ok_or_else(|| RepoDeckError::unknown_remote(&url))?;

            let pending = PendingCommand::new(base)
                .shell(format!("gh repo delete {} --yes", shell_quote(&slug)))
                .step(Step::RemoveDir(path.clone()));
            let warning = format!(
                "This permanently deletes '{slug}' on GitHub and the folder '{}'.\n\n{}",
                path.display(),
                format_steps(&pending)
            );

            o.enter(ActionPhase::AwaitingConfirmation);
            if !ConfirmationGate::new(o.services.prompter).confirm_destructive(repo, &warning) {
                return Ok(ActionOutcome::Declined);
            }
            let executed = o.execute(&pending);

            if !path.exists() {
                o.cache.remove(&path)?;
            }
            executed?;

            o.schedule(RefreshRequest::rescan());
            Ok(ActionOutcome::completed(format!("Deleted '{repo}'")))
        })
    }

    pub fn set_visibility(&mut self, repo: &str, visibility: Visibility) -> Result<ActionOutcome> {
        self.run("visibility", |o| {
            o.require_login()?;
            let path = o.selected(repo)?;

            let pending = PendingCommand::new(&path).shell(format!(
                "gh repo edit --visibility {visibility} --accept-visibility-change-consequences"
            ));
            if !o.confirm_and_execute("RUN COMMANDS", &pending)? {
                return Ok(ActionOutcome::Declined);
            }

            o.cache.upsert(&path, visibility.is_private())?;
            o.schedule(RefreshRequest::rescan());
            Ok(ActionOutcome::completed(format!("'{repo}' is now {visibility}")))
        })
    }

    /// Publish the current branch's files as a brand new repository
    pub fn branch_to_repo(&mut self, repo: &str) -> Result<ActionOutcome> {
        self.run("branch to repo", |o| {
            let user = o.require_login()?;
            let path = o.selected(repo)?;
            let base = o.base_dir()?;
            let branch = o.current_branch(&path)?;

            let default_name = format!("{repo}_{}", file_safe(&branch));
            let Some(name) = o.ask("New Repo", "Enter repository name:", Some(default_name.as_str())) else {
                return Ok(ActionOutcome::Declined);
            };
            validate_name(&name)?;
            let target = base.join(&name);
            if target.exists() {
                return Err(RepoDeckError::name_collision(name));
            }
            let visibility =
                Visibility::from_private(o.services.prompter.confirm("New Repo", "Private?"));

            let archive = target.join(format!("{name}.zip"));
            let (target_q, archive_q) = (quote_path(&target), quote_path(&archive));
            let pending = PendingCommand::new(&path)
                .shell(format!("mkdir {target_q}"))
                .shell(format!(
                    "git archive {} --output={archive_q}",
                    shell_quote(&branch)
                ))
                .shell(format!("unzip -q {archive_q} -d {target_q}"))
                .shell(format!("rm {archive_q}"))
                .shell(format!("git init {target_q}"))
                .shell(format!("git -C {target_q} add ."))
                .shell(format!(
                    "git -C {target_q} commit -m {}",
                    shell_quote(&format!("Initial commit from branch {branch}"))
                ))
                .shell(format!(
                    "gh repo create {} {} --source={target_q} --remote=origin",
                    shell_quote(&format!("{user}/{name}")),
                    visibility.create_flag()
                ))
                .shell(format!("git -C {target_q} push -u origin HEAD"));
            if !o.confirm_and_execute("RUN COMMANDS", &pending)? {
                return Ok(ActionOutcome::Declined);
            }

            o.cache.upsert(&target, visibility.is_private())?;
            o.schedule(RefreshRequest::created(base, &name));
            Ok(ActionOutcome::completed(format!(
                "Created '{name}' from branch '{branch}'"
            )))
        })
    }

    /// Archive the current branch next to the repository, in the background
    pub fn zip(&mut self, repo: &str) -> Result<ActionOutcome> {
        self.run("zip", |o| {
            let path = o.selected(repo)?;
            let base = o.base_dir()?;
            let branch = o.current_branch(&path)?;
            let archive = base.join(format!("{repo}_{}.zip", file_safe(&branch)));
            let command = format!(
                "git archive {} --output={}",
                shell_quote(&branch),
                quote_path(&archive)
            );

            o.enter(ActionPhase::Executing);
            let result = o.services.runner.run_detached(&command, &path);
            if !result.success {
                return Err(RepoDeckError::command_failed(
                    command,
                    0,
                    1,
                    result.output.trim(),
                ));
            }
            Ok(ActionOutcome::completed(format!(
                "Writing {}",
                archive.display()
            )))
        })
    }

    pub fn repo_link(&mut self, repo: &str) -> Result<ActionOutcome> {
        self.run("link", |o| {
            let user = o.require_login()?;
            Ok(ActionOutcome::completed(format!("https://github.com/{user}/{repo}")))
        })
    }

    pub fn open_dir(&mut self, repo: &str) -> Result<ActionOutcome> {
        self.run("open", |o| {
            let path = o.selected(repo)?;
            let command = format!("{} {}", opener(), quote_path(&path));

            o.enter(ActionPhase::Executing);
            let result = o.services.runner.run_detached(&command, &path);
            if !result.success {
                return Err(RepoDeckError::command_failed(
                    command,
                    0,
                    1,
                    result.output.trim(),
                ));
            }
            Ok(ActionOutcome::completed(format!("Opened {}", path.display())))
        })
    }

    fn current_branch(&self, path: &Path) -> Result<String> {
        self.services
            .inspector
            .head(path)
            .branch_name()
            .map(str::to_string)
            .ok_or(RepoDeckError::UnknownCurrentBranch)
    }
}

fn opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "start \"\""
    } else {
        "xdg-open"
    }
}

/// Folder name `git clone` will create for `url`
fn clone_target(url: &str) -> Option<String> {
    let last = url
        .trim()
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    (!name.is_empty()).then(|| name.to_string())
}
