//! Color mapping for the terminal views.
//!
//! # Color Scheme
//! - **Modified**: Yellow
//! - **Added**: Green
//! - **Deleted**: Red
//! - **Renamed**: Blue
//! - **Untracked**: Cyan
//! - **Unmerged**: Red bold, conflicts need attention first
//! - **Private repositories**: Yellow name, public ones stay white

use crate::core::git_status::GitStatus;
use crate::core::state::{RepoEntry, Visibility};
use colored::*;

/// Color function for a work tree status
pub fn get_status_color_style(status: GitStatus) -> Box<dyn Fn(&str) -> ColoredString> {
    match status {
        GitStatus::Modified => Box::new(|text: &str| text.yellow()),
        GitStatus::Untracked => Box::new(|text: &str| text.cyan()),
        GitStatus::Deleted => Box::new(|text: &str| text.red()),
        GitStatus::Added => Box::new(|text: &str| text.green()),
        GitStatus::Renamed => Box::new(|text: &str| text.blue()),
        GitStatus::TypeChanged => Box::new(|text: &str| text.magenta()),
        GitStatus::Unmerged => Box::new(|text: &str| text.red().bold()),
    }
}

/// `modified:   src/lib.rs`, padded so paths line up
pub fn format_change(status: GitStatus, path: &str) -> String {
    let color_fn = get_status_color_style(status);
    let label = format!("{:<13}", format!("{}:", status.description()));
    format!("{}{}", color_fn(&label), color_fn(path))
}

pub fn format_entry(entry: &RepoEntry, selected: bool) -> String {
    let name = match entry.visibility {
        Visibility::Private => entry.name.yellow(),
        Visibility::Public => entry.name.white(),
    };
    let pointer = if selected { "➤".green() } else { " ".normal() };
    format!("{pointer} {} {name}", entry.visibility.marker())
}
