//! GitHub CLI queries.
//!
//! Two questions are asked of the hosting platform: who is logged in, and is a
//! given repository private. Both fail open: a missing `gh`, a network error
//! or unexpected output means "nobody" and "public" respectively.

use crate::core::runner::capture;
use serde::Deserialize;
use std::path::Path;

const PUBLIC_REPLY: &str = r#"{"isPrivate": false}"#;

/// Answers whether a local repository's remote is private
pub trait VisibilitySource {
    fn is_private(&self, repo: &Path) -> bool;
}

pub trait HostingCli: VisibilitySource {
    /// Login name of the authenticated account, if any
    fn authenticated_user(&self) -> Option<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GhCli;

impl GhCli {
    pub fn new() -> Self {
        Self
    }
}

impl VisibilitySource for GhCli {
    fn is_private(&self, repo: &Path) -> bool {
        let reply = capture(
            "gh",
            &["repo", "view", "--json", "isPrivate"],
            Some(repo),
            PUBLIC_REPLY,
        )
        .output_or(PUBLIC_REPLY);
        let is_private = parse_visibility(&reply);
        log::debug!("{} is_private={is_private}", repo.display());
        is_private
    }
}

impl HostingCli for GhCli {
    fn authenticated_user(&self) -> Option<String> {
        let status = capture("gh", &["auth", "status"], None, "");
        parse_auth_user(&status.output)
    }
}

#[derive(Deserialize)]
struct VisibilityReply {
    #[serde(rename = "isPrivate", default)]
    is_private: bool,
}

/// Parse `{"isPrivate": bool}`; anything else counts as public
pub fn parse_visibility(reply: &str) -> bool {
    match serde_json::from_str::<VisibilityReply>(reply.trim()) {
        Ok(reply) => reply.is_private,
        Err(e) => {
            log::debug!("Unparseable visibility reply ({e}), assuming public");
            false
        }
    }
}

/// Pull the login out of `gh auth status` output.
///
/// Accepts both "Logged in to github.com as NAME" and the newer
/// "Logged in to github.com account NAME" phrasing.
pub fn parse_auth_user(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let rest = line.split("Logged in to github.com").nth(1)?;
        let mut words = rest.split_whitespace();
        match words.next()? {
            "as" | "account" => words
                .next()
                .map(|name| name.trim_matches(|c: char| c == '(' || c == ')'))
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            _ => None,
        }
    })
}
