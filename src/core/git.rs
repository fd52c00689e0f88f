//! Read-only repository queries.
//!
//! This module provides [`GitRepo`], a thin wrapper over `git2` that answers
//! the questions the detail view and the orchestrator's prechecks ask: which
//! branch is checked out, which local branches exist, what changed in the work
//! tree, the last commit, and where `origin` points. Mutations never go
//! through here; they are shell steps the user confirms.
//!
//! # Public API
//! - [`RepoInspector`]: Query seam used by the orchestrator and reconciler
//! - [`Git2Inspector`]: `git2`-backed implementation
//! - [`HeadState`]: Checked-out branch with an explicit `Unknown` sentinel
//! - [`RepoDetail`]: Everything the detail view shows for one repository
//! - [`github_slug`]: `owner/name` from a GitHub remote URL

use crate::core::error::Result;
use crate::core::git_status::{FileChange, GitStatus, WorktreeSummary};
use chrono::{DateTime, Utc};
use git2::{BranchType, Repository, StatusOptions};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    Branch(String),
    /// Branch checked out but no commit made yet
    Unborn(String),
    Detached(String),
    Unknown,
}

impl HeadState {
    /// Name usable in `git push <remote> <branch>`
    pub fn branch_name(&self) -> Option<&str> {
        match self {
            HeadState::Branch(name) | HeadState::Unborn(name) => Some(name),
            HeadState::Detached(_) | HeadState::Unknown => None,
        }
    }
}

impl fmt::Display for HeadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadState::Branch(name) => f.write_str(name),
            HeadState::Unborn(name) => write!(f, "{name} (no commits)"),
            HeadState::Detached(short) => write!(f, "detached at {short}"),
            HeadState::Unknown => f.write_str("unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub short_hash: String,
    pub summary: String,
    pub author: String,
    pub time: Option<DateTime<Utc>>,
}

impl CommitSummary {
    /// `abc1234 - message (author, 3 hours ago)`
    pub fn describe(&self, now: DateTime<Utc>) -> String {
        let age = self
            .time
            .map(|time| relative_age(time, now))
            .unwrap_or_else(|| "unknown time".to_string());
        format!(
            "{} - {} ({}, {})",
            self.short_hash, self.summary, self.author, age
        )
    }
}

pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    let (amount, unit) = match secs {
        s if s < 60 => (s, "second"),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 30 * 86_400 => (s / 86_400, "day"),
        s if s < 365 * 86_400 => (s / (30 * 86_400), "month"),
        s => (s / (365 * 86_400), "year"),
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}

/// Everything shown for the selected repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDetail {
    pub path: PathBuf,
    pub head: HeadState,
    pub changes: Vec<FileChange>,
    pub summary: WorktreeSummary,
    pub last_commit: Option<CommitSummary>,
    pub branches: Vec<String>,
}

impl RepoDetail {
    pub fn unknown(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            head: HeadState::Unknown,
            changes: Vec::new(),
            summary: WorktreeSummary::default(),
            last_commit: None,
            branches: Vec::new(),
        }
    }

    pub fn has_commits(&self) -> bool {
        self.last_commit.is_some()
    }
}

pub trait RepoInspector {
    fn head(&self, repo: &Path) -> HeadState;
    /// Local branch names, sorted
    fn branches(&self, repo: &Path) -> Vec<String>;
    fn remote_url(&self, repo: &Path, remote: &str) -> Option<String>;
    fn detail(&self, repo: &Path) -> RepoDetail;
}

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open exactly `path`; parent directories are not searched
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path)?;
        Ok(GitRepo { repo })
    }

    pub fn head_state(&self) -> HeadState {
        match self.repo.head() {
            Ok(head) if head.is_branch() => head
                .shorthand()
                .map(|name| HeadState::Branch(name.to_string()))
                .unwrap_or(HeadState::Unknown),
            Ok(head) => head
                .target()
                .map(|oid| HeadState::Detached(oid.to_string()[..7].to_string()))
                .unwrap_or(HeadState::Unknown),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => self
                .unborn_branch()
                .map(HeadState::Unborn)
                .unwrap_or(HeadState::Unknown),
            Err(e) => {
                log::debug!("Cannot read HEAD: {e}");
                HeadState::Unknown
            }
        }
    }

    fn unborn_branch(&self) -> Option<String> {
        let head = self.repo.find_reference("HEAD").ok()?;
        let target = head.symbolic_target()?;
        Some(target.strip_prefix("refs/heads/").unwrap_or(target).to_string())
    }

    pub fn local_branches(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn status(&self) -> Result<Vec<FileChange>> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true);
        opts.include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let mut changes = Vec::new();
        for entry in statuses.iter() {
            let Some(path) = entry.path() else {
                continue;
            };
            let flags = entry.status();
            if let Some(status) = GitStatus::from_git2_staged(flags) {
                changes.push(FileChange {
                    status,
                    path: PathBuf::from(path),
                    staged: true,
                });
            }
            if let Some(status) = GitStatus::from_git2_unstaged(flags) {
                changes.push(FileChange {
                    status,
                    path: PathBuf::from(path),
                    staged: false,
                });
            }
        }
        changes.sort_by(|a, b| b.staged.cmp(&a.staged).then_with(|| a.path.cmp(&b.path)));
        Ok(changes)
    }

    pub fn last_commit(&self) -> Option<CommitSummary> {
        let commit = self.repo.head().ok()?.peel_to_commit().ok()?;
        let id = commit.id().to_string();
        let author = commit.author().name().unwrap_or("unknown").to_string();
        Some(CommitSummary {
            short_hash: id[..7].to_string(),
            summary: commit.summary().unwrap_or("").to_string(),
            author,
            time: DateTime::from_timestamp(commit.time().seconds(), 0),
        })
    }

    pub fn remote_url(&self, remote: &str) -> Option<String> {
        let remote = self.repo.find_remote(remote).ok()?;
        remote.url().map(str::to_string)
    }

    pub fn detail(&self) -> RepoDetail {
        let path = self
            .repo
            .workdir()
            .unwrap_or_else(|| self.repo.path())
            .to_path_buf();
        let changes = self.status().unwrap_or_else(|e| {
            log::debug!("Status unavailable for {}: {e}", path.display());
            Vec::new()
        });
        RepoDetail {
            summary: WorktreeSummary::from_changes(&changes),
            head: self.head_state(),
            last_commit: self.last_commit(),
            branches: self.local_branches().unwrap_or_default(),
            changes,
            path,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Inspector;

impl Git2Inspector {
    pub fn new() -> Self {
        Self
    }

    fn open(repo: &Path) -> Option<GitRepo> {
        GitRepo::open(repo)
            .map_err(|e| log::debug!("Cannot open {}: {e}", repo.display()))
            .ok()
    }
}

impl RepoInspector for Git2Inspector {
    fn head(&self, repo: &Path) -> HeadState {
        Self::open(repo)
            .map(|git| git.head_state())
            .unwrap_or(HeadState::Unknown)
    }

    fn branches(&self, repo: &Path) -> Vec<String> {
        Self::open(repo)
            .and_then(|git| git.local_branches().ok())
            .unwrap_or_default()
    }

    fn remote_url(&self, repo: &Path, remote: &str) -> Option<String> {
        Self::open(repo)?.remote_url(remote)
    }

    fn detail(&self, repo: &Path) -> RepoDetail {
        match Self::open(repo) {
            Some(git) => RepoDetail {
                path: repo.to_path_buf(),
                ..git.detail()
            },
            None => RepoDetail::unknown(repo),
        }
    }
}

/// `owner/name` from an `https://github.com/...` or `git@github.com:...` URL
pub fn github_slug(url: &str) -> Option<String> {
    let rest = url.trim().split("github.com").nth(1)?;
    let rest = rest
        .trim_start_matches(|c| c == ':' || c == '/')
        .trim_end_matches('/');
    let rest = rest.strip_suffix(".git").unwrap_or(rest);

    let mut parts = rest.split('/');
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let name = parts.next().filter(|s| !s.is_empty())?;
    if parts.next().is_some() {
        return None;
    }
    Some(format!("{owner}/{name}"))
}
