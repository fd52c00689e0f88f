//! Structured working-tree status.
//!
//! The detail view used to be built by scraping `git status` text. Here the
//! status comes from git2 flags and is folded into [`FileChange`] entries and a
//! [`WorktreeSummary`], so nothing depends on the wording or locale of git's
//! porcelain output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Kind of change recorded for one path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GitStatus {
    Modified,
    Added,
    Deleted,
    Renamed,
    TypeChanged,
    Untracked,
    /// Conflicted after a merge or rebase
    Unmerged,
}

impl GitStatus {
    /// Staged side of git2 flags
    pub fn from_git2_staged(flags: git2::Status) -> Option<GitStatus> {
        if flags.contains(git2::Status::INDEX_NEW) {
            return Some(GitStatus::Added);
        }
        if flags.contains(git2::Status::INDEX_MODIFIED) {
            return Some(GitStatus::Modified);
        }
        if flags.contains(git2::Status::INDEX_DELETED) {
            return Some(GitStatus::Deleted);
        }
        if flags.contains(git2::Status::INDEX_RENAMED) {
            return Some(GitStatus::Renamed);
        }
        if flags.contains(git2::Status::INDEX_TYPECHANGE) {
            return Some(GitStatus::TypeChanged);
        }
        None
    }

    /// Working-tree side of git2 flags
    pub fn from_git2_unstaged(flags: git2::Status) -> Option<GitStatus> {
        if flags.contains(git2::Status::CONFLICTED) {
            return Some(GitStatus::Unmerged);
        }
        if flags.contains(git2::Status::WT_NEW) {
            return Some(GitStatus::Untracked);
        }
        if flags.contains(git2::Status::WT_MODIFIED) {
            return Some(GitStatus::Modified);
        }
        if flags.contains(git2::Status::WT_DELETED) {
            return Some(GitStatus::Deleted);
        }
        if flags.contains(git2::Status::WT_RENAMED) {
            return Some(GitStatus::Renamed);
        }
        if flags.contains(git2::Status::WT_TYPECHANGE) {
            return Some(GitStatus::TypeChanged);
        }
        None
    }

    pub fn description(&self) -> &'static str {
        match self {
            GitStatus::Modified => "modified",
            GitStatus::Added => "new file",
            GitStatus::Deleted => "deleted",
            GitStatus::Renamed => "renamed",
            GitStatus::TypeChanged => "typechange",
            GitStatus::Untracked => "untracked",
            GitStatus::Unmerged => "both modified",
        }
    }
}

impl fmt::Display for GitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub status: GitStatus,
    pub path: PathBuf,
    pub staged: bool,
}

/// Counts derived from a list of [`FileChange`]s
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorktreeSummary {
    pub staged: usize,
    pub unstaged: usize,
    pub untracked: usize,
    pub conflicted: usize,
}

impl WorktreeSummary {
    pub fn from_changes(changes: &[FileChange]) -> Self {
        let mut summary = Self::default();
        for change in changes {
            match (change.status, change.staged) {
                (GitStatus::Unmerged, _) => summary.conflicted += 1,
                (GitStatus::Untracked, _) => summary.untracked += 1,
                (_, true) => summary.staged += 1,
                (_, false) => summary.unstaged += 1,
            }
        }
        summary
    }

    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }

    /// Tracked files modified but not staged; drives the red/green indicator
    pub fn has_unstaged(&self) -> bool {
        self.unstaged > 0 || self.conflicted > 0
    }

    /// One-line replacement for the first line of `git status`
    pub fn headline(&self) -> String {
        if self.is_clean() {
            return "nothing to commit, working tree clean".to_string();
        }

        let mut parts = Vec::new();
        if self.conflicted > 0 {
            parts.push(format!("{} conflicted", self.conflicted));
        }
        if self.staged > 0 {
            parts.push(format!("{} staged", self.staged));
        }
        if self.unstaged > 0 {
            parts.push(format!("{} not staged", self.unstaged));
        }
        if self.untracked > 0 {
            parts.push(format!("{} untracked", self.untracked));
        }
        parts.join(", ")
    }
}
