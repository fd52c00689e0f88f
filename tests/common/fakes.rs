//! Recording stand-ins for the collaborator seams
//!
//! Every fake keeps what it was asked in a `RefCell` so tests can assert on
//! it after the action returns. Answers are scripted up front; once a script
//! runs out the fake behaves like a user who dismissed the dialog.

#![allow(dead_code)]

use repo_deck::commands::{Listing, ViewObserver};
use repo_deck::core::{
    gate::{Notice, Prompter},
    git::{HeadState, RepoDetail, RepoInspector},
    hosting::{HostingCli, VisibilitySource},
    runner::CommandRunner,
    state::CommandResult,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// Records every command instead of running it
#[derive(Default)]
pub struct SpyRunner {
    pub commands: RefCell<Vec<String>>,
    pub cwds: RefCell<Vec<PathBuf>>,
    pub detached: RefCell<Vec<String>>,
    /// First command containing this text fails with output `boom`
    pub fail_on: Option<String>,
}

impl SpyRunner {
    pub fn failing_on(text: &str) -> Self {
        Self {
            fail_on: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    pub fn invocations(&self) -> usize {
        self.commands.borrow().len() + self.detached.borrow().len()
    }
}

impl CommandRunner for SpyRunner {
    fn run_sync(&self, command: &str, cwd: &Path, fallback: &str) -> CommandResult {
        self.commands.borrow_mut().push(command.to_string());
        self.cwds.borrow_mut().push(cwd.to_path_buf());
        match &self.fail_on {
            Some(text) if command.contains(text.as_str()) => CommandResult::failed("boom", fallback),
            _ => CommandResult::succeeded(""),
        }
    }

    fn run_detached(&self, command: &str, _cwd: &Path) -> CommandResult {
        self.detached.borrow_mut().push(command.to_string());
        CommandResult::succeeded("")
    }
}

/// Answers prompts from queues
#[derive(Default)]
pub struct ScriptedPrompter {
    pub confirms: RefCell<VecDeque<bool>>,
    pub texts: RefCell<VecDeque<Option<String>>>,
    pub choices: RefCell<VecDeque<Option<String>>>,
    pub confirm_messages: RefCell<Vec<String>>,
    pub text_defaults: RefCell<Vec<Option<String>>>,
    pub notices: RefCell<Vec<Notice>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(self) -> Self {
        self.confirms.borrow_mut().push_back(true);
        self
    }

    pub fn decline(self) -> Self {
        self.confirms.borrow_mut().push_back(false);
        self
    }

    pub fn text(self, answer: &str) -> Self {
        self.texts.borrow_mut().push_back(Some(answer.to_string()));
        self
    }

    pub fn dismiss_text(self) -> Self {
        self.texts.borrow_mut().push_back(None);
        self
    }

    pub fn choice(self, answer: &str) -> Self {
        self.choices.borrow_mut().push_back(Some(answer.to_string()));
        self
    }

    /// Prompts that were asked but never answered from the script
    pub fn unused_answers(&self) -> usize {
        self.confirms.borrow().len() + self.texts.borrow().len() + self.choices.borrow().len()
    }

    pub fn infos(&self) -> Vec<String> {
        self.notices
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Notice::Info(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, _title: &str, message: &str) -> bool {
        self.confirm_messages.borrow_mut().push(message.to_string());
        self.confirms.borrow_mut().pop_front().unwrap_or(false)
    }

    fn ask_text(&self, _title: &str, _prompt: &str, default: Option<&str>) -> Option<String> {
        self.text_defaults
            .borrow_mut()
            .push(default.map(str::to_string));
        self.texts.borrow_mut().pop_front().flatten()
    }

    fn choose(&self, _title: &str, _options: &[String], _default: Option<&str>) -> Option<String> {
        self.choices.borrow_mut().pop_front().flatten()
    }

    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

/// Repository queries answered from fixed values
pub struct FakeInspector {
    pub head: HeadState,
    pub branches: Vec<String>,
    pub remote: Option<String>,
    pub detail_calls: Cell<usize>,
}

impl FakeInspector {
    pub fn on_branch(head: &str, branches: &[&str]) -> Self {
        Self {
            head: HeadState::Branch(head.to_string()),
            branches: branches.iter().map(|b| b.to_string()).collect(),
            remote: Some("https://github.com/octo/alpha.git".to_string()),
            detail_calls: Cell::new(0),
        }
    }
}

impl Default for FakeInspector {
    fn default() -> Self {
        Self::on_branch("main", &["main", "topic"])
    }
}

impl RepoInspector for FakeInspector {
    fn head(&self, _repo: &Path) -> HeadState {
        self.head.clone()
    }

    fn branches(&self, _repo: &Path) -> Vec<String> {
        self.branches.clone()
    }

    fn remote_url(&self, _repo: &Path, _remote: &str) -> Option<String> {
        self.remote.clone()
    }

    fn detail(&self, repo: &Path) -> RepoDetail {
        self.detail_calls.set(self.detail_calls.get() + 1);
        RepoDetail {
            head: self.head.clone(),
            branches: self.branches.clone(),
            ..RepoDetail::unknown(repo)
        }
    }
}

/// `gh` stand-in: fixed login and a set of private repository folder names
pub struct FakeHosting {
    pub user: Option<String>,
    pub private: HashSet<String>,
    pub queries: RefCell<Vec<PathBuf>>,
}

impl FakeHosting {
    pub fn logged_in(user: &str) -> Self {
        Self {
            user: Some(user.to_string()),
            private: HashSet::new(),
            queries: RefCell::new(Vec::new()),
        }
    }

    pub fn logged_out() -> Self {
        Self {
            user: None,
            ..Self::logged_in("")
        }
    }

    pub fn with_private(mut self, name: &str) -> Self {
        self.private.insert(name.to_string());
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.borrow().len()
    }
}

impl Default for FakeHosting {
    fn default() -> Self {
        Self::logged_in("octo")
    }
}

impl VisibilitySource for FakeHosting {
    fn is_private(&self, repo: &Path) -> bool {
        self.queries.borrow_mut().push(repo.to_path_buf());
        repo.file_name()
            .map(|n| self.private.contains(n.to_string_lossy().as_ref()))
            .unwrap_or(false)
    }
}

impl HostingCli for FakeHosting {
    fn authenticated_user(&self) -> Option<String> {
        self.user.clone()
    }
}

/// Keeps every listing and detail it was shown
#[derive(Default)]
pub struct RecordingObserver {
    pub listings: Vec<Listing>,
    pub details: Vec<RepoDetail>,
}

impl RecordingObserver {
    pub fn last_listing_names(&self) -> Vec<String> {
        self.listings
            .last()
            .map(|l| l.entries.iter().map(|e| e.name.clone()).collect())
            .unwrap_or_default()
    }
}

impl ViewObserver for RecordingObserver {
    fn listing_changed(&mut self, listing: &Listing) {
        self.listings.push(listing.clone());
    }

    fn detail_changed(&mut self, detail: &RepoDetail) {
        self.details.push(detail.clone());
    }
}
