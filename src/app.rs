//! Application context.
//!
//! [`AppContext`] owns the long-lived state (settings, cache, refresh queue,
//! current listing) and the boxed collaborators. Components only ever borrow
//! the narrow trait they need from it.

use crate::commands::{Listing, Orchestrator, Reconciler, Services, ViewObserver};
use crate::core::{
    config::Settings,
    error::{RepoDeckError, Result},
    gate::Prompter,
    git::{Git2Inspector, RepoDetail, RepoInspector},
    hosting::{GhCli, HostingCli},
    runner::{CommandRunner, ShellRunner},
    scan::is_repository,
    scheduler::RefreshQueue,
    StatusCache,
};
use std::path::PathBuf;

pub struct AppContext {
    pub settings: Settings,
    pub base: PathBuf,
    pub cache: StatusCache,
    pub queue: RefreshQueue,
    pub listing: Listing,
    runner: Box<dyn CommandRunner>,
    prompter: Box<dyn Prompter>,
    inspector: Box<dyn RepoInspector>,
    hosting: Box<dyn HostingCli>,
}

impl AppContext {
    /// Context wired to the shell, `git2` and the `gh` CLI
    pub fn new(settings: Settings, base: PathBuf, prompter: Box<dyn Prompter>) -> Self {
        let cache = StatusCache::load(settings.status_file());
        Self::with_collaborators(
            settings,
            base,
            cache,
            Box::new(ShellRunner::new()),
            prompter,
            Box::new(Git2Inspector::new()),
            Box::new(GhCli::new()),
        )
    }

    pub fn with_collaborators(
        settings: Settings,
        base: PathBuf,
        cache: StatusCache,
        runner: Box<dyn CommandRunner>,
        prompter: Box<dyn Prompter>,
        inspector: Box<dyn RepoInspector>,
        hosting: Box<dyn HostingCli>,
    ) -> Self {
        let listing = Listing {
            base: base.clone(),
            ..Listing::default()
        };
        Self {
            settings,
            base,
            cache,
            queue: RefreshQueue::new(),
            listing,
            runner,
            prompter,
            inspector,
            hosting,
        }
    }

    pub fn orchestrator(&mut self) -> Orchestrator<'_> {
        let services = Services {
            runner: self.runner.as_ref(),
            prompter: self.prompter.as_ref(),
            inspector: self.inspector.as_ref(),
            hosting: self.hosting.as_ref(),
        };
        Orchestrator::new(
            &self.base,
            &self.settings,
            &mut self.cache,
            &mut self.queue,
            services,
        )
    }

    pub fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(self.inspector.as_ref())
    }

    pub fn hosting(&self) -> &dyn HostingCli {
        self.hosting.as_ref()
    }

    /// Re-read the listing, keeping the selection when it still exists
    pub fn refresh_listing(&mut self, observer: &mut dyn ViewObserver) -> Result<&Listing> {
        let previous = self.listing.selected.take();
        let mut listing =
            Reconciler::new(self.inspector.as_ref()).refresh_listing(&self.base, &self.cache, observer)?;
        if let Some(previous) = previous {
            listing.select(&previous);
        }
        self.listing = listing;
        Ok(&self.listing)
    }

    /// Fill cache gaps for repositories that appeared since the last run
    pub fn refresh_missing(&mut self) -> Result<usize> {
        self.cache.refresh_missing(&self.base, self.hosting.as_ref())
    }

    /// Wait for the refreshes queued by the last action
    pub async fn settle(&mut self, observer: &mut dyn ViewObserver) -> usize {
        let reconciler = Reconciler::new(self.inspector.as_ref());
        reconciler
            .run_deferred(
                &mut self.queue,
                &self.base,
                &mut self.cache,
                self.hosting.as_ref(),
                &mut self.listing,
                observer,
            )
            .await
    }

    pub async fn rebuild(&mut self, observer: &mut dyn ViewObserver) -> Result<&Listing> {
        let reconciler = Reconciler::new(self.inspector.as_ref());
        self.listing = reconciler
            .rebuild_from_scratch(
                &self.base,
                &mut self.cache,
                self.hosting.as_ref(),
                observer,
                self.settings.rescan_step(),
            )
            .await?;
        Ok(&self.listing)
    }

    /// Select `name` and show its detail view
    pub fn show(&mut self, name: &str, observer: &mut dyn ViewObserver) -> Result<RepoDetail> {
        if name.trim().is_empty() {
            return Err(RepoDeckError::NoSelection);
        }
        let path = self.base.join(name);
        if !is_repository(&path) {
            return Err(RepoDeckError::not_a_repository(name));
        }
        self.listing.select(name);
        Ok(self.reconciler().refresh_detail(&path, observer))
    }
}
