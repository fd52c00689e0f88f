//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`RepoDeckError`] which covers every way a repository
//! action can be refused or fail. It uses `thiserror` for ergonomic error
//! definitions and includes constructors for the common failure scenarios.
//!
//! # Public API
//! - [`RepoDeckError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, RepoDeckError>`
//!
//! # Error Categories
//! - **Preconditions**: Invalid base path, missing selection, missing login
//! - **Repository state**: No branches, only branch, unknown remote
//! - **Execution**: A confirmed command step exited non-zero
//! - **Persistence**: Settings and cache file I/O

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for repo-deck
#[derive(Error, Debug)]
pub enum RepoDeckError {
    // Precondition errors
    #[error("Invalid base directory path: {path}")]
    InvalidBasePath { path: PathBuf },

    #[error("Please select a repository")]
    NoSelection,

    #[error("'{name}' is not a git repository")]
    NotARepository { name: String },

    #[error("You must be logged in to GitHub to perform this action")]
    NotAuthenticated,

    #[error("A folder named '{name}' already exists")]
    NameCollision { name: String },

    #[error("Invalid name: '{name}'")]
    InvalidName { name: String },

    // Repository state errors
    #[error("No existing branches found in this repository")]
    NoBranches,

    #[error("Branch '{branch}' does not exist")]
    UnknownBranch { branch: String },

    #[error("Cannot delete '{branch}', it is the only branch")]
    OnlyBranch { branch: String },

    #[error("Could not determine the current branch")]
    UnknownCurrentBranch,

    #[error("Could not derive a GitHub repository from remote '{remote}'")]
    UnknownRemote { remote: String },

    // Execution errors
    #[error("Command failed: {step}\n{completed} of {total} earlier steps already applied\n{output}")]
    CommandFailed {
        step: String,
        completed: usize,
        total: usize,
        output: String,
    },

    #[error("Failed to {action} '{path}': {source}")]
    FilesystemStep {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    // Persistence errors
    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write cache file '{path}': {source}")]
    CacheWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Git repository error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using RepoDeckError
pub type Result<T> = std::result::Result<T, RepoDeckError>;

impl RepoDeckError {
    pub fn invalid_base_path(path: impl Into<PathBuf>) -> Self {
        Self::InvalidBasePath { path: path.into() }
    }

    pub fn not_a_repository(name: impl Into<String>) -> Self {
        Self::NotARepository { name: name.into() }
    }

    pub fn name_collision(name: impl Into<String>) -> Self {
        Self::NameCollision { name: name.into() }
    }

    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    pub fn unknown_branch(branch: impl Into<String>) -> Self {
        Self::UnknownBranch {
            branch: branch.into(),
        }
    }

    pub fn only_branch(branch: impl Into<String>) -> Self {
        Self::OnlyBranch {
            branch: branch.into(),
        }
    }

    pub fn unknown_remote(remote: impl Into<String>) -> Self {
        Self::UnknownRemote {
            remote: remote.into(),
        }
    }

    /// Create a command failure carrying how far the sequence got
    pub fn command_failed(
        step: impl Into<String>,
        completed: usize,
        total: usize,
        output: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            step: step.into(),
            completed,
            total,
            output: output.into(),
        }
    }

    pub fn filesystem_step(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FilesystemStep {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn directory_creation_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreationFailed {
            path: path.into(),
            source,
        }
    }

    pub fn cache_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheWriteFailed {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised before any command was built or confirmed
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidBasePath { .. }
                | Self::NoSelection
                | Self::NotARepository { .. }
                | Self::NotAuthenticated
                | Self::NameCollision { .. }
                | Self::InvalidName { .. }
                | Self::NoBranches
                | Self::UnknownBranch { .. }
                | Self::OnlyBranch { .. }
                | Self::UnknownCurrentBranch
                | Self::UnknownRemote { .. }
        )
    }
}
