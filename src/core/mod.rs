//! Core functionality for repo-deck.
//!
//! This module provides the building blocks the actions are made of: the
//! visibility cache, command execution, confirmation, repository queries,
//! GitHub CLI queries, error handling and terminal output.

pub mod cache;
pub mod colors;
pub mod config;
pub mod dirs;
pub mod error;
pub mod gate;
pub mod git;
pub mod git_status;
pub mod hosting;
pub mod output;
pub mod runner;
pub mod scan;
pub mod scheduler;
pub mod state;
pub mod terminal;

// === Error handling ===
pub use error::{RepoDeckError, Result};

// === Visibility cache ===
// Persisted path -> isPrivate map, the only record that survives restarts
pub use cache::{RebuildScan, StatusCache};

// === Collaborator seams ===
// Traits the orchestrator executes and asks through; tests swap in fakes
pub use gate::{ConfirmationGate, Notice, Prompter};
pub use git::{Git2Inspector, GitRepo, HeadState, RepoDetail, RepoInspector};
pub use hosting::{GhCli, HostingCli, VisibilitySource};
pub use runner::{CommandRunner, ShellRunner};

// === State ===
pub use config::Settings;
pub use git_status::{FileChange, GitStatus, WorktreeSummary};
pub use scheduler::RefreshQueue;
pub use state::{
    ActionOutcome, CommandResult, PendingCommand, RefreshRequest, RepoEntry, Step, Visibility,
};

// === Output formatting ===
pub use output::{print_error, print_info, print_notice, print_section_header, print_success};
pub use terminal::{TerminalPrompter, TerminalView};
