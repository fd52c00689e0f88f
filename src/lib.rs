//! repo-deck - browse a folder of Git repositories and run confirmed Git and
//! GitHub CLI actions against them.
//!
//! Every mutating action is shown to the user as the literal commands it will
//! run, executed only after confirmation, and followed by a deferred
//! reconciliation of the listing, the selected repository's detail view and
//! the persisted visibility cache.
//!
//! # Public API
//! - [`AppContext`]: Owns settings, cache, refresh queue and collaborators
//! - [`commands::Orchestrator`]: One method per user action
//! - [`commands::Reconciler`]: Re-reads disk state after actions
//! - [`core`]: Cache, runner, confirmation gate, queries, errors and output

pub mod app;
pub mod commands;
pub mod core;

pub use app::AppContext;
pub use core::{
    ActionOutcome, CommandRunner, HostingCli, Prompter, RepoDeckError, RepoInspector, Result,
    Settings, StatusCache, Visibility, VisibilitySource,
};
