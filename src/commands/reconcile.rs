//! Bring the visible state back in line with disk after commands run.
//!
//! The reconciler re-reads; it never decides anything. Listings come from the
//! base directory plus the [`StatusCache`], details come from the
//! [`RepoInspector`], and both are pushed to a [`ViewObserver`].

use crate::core::{
    error::Result,
    git::{RepoDetail, RepoInspector},
    hosting::VisibilitySource,
    scan::list_repositories,
    scheduler::RefreshQueue,
    state::{RefreshRequest, RepoEntry, Visibility},
    StatusCache,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Receives refreshed state; the terminal view is one implementation
pub trait ViewObserver {
    fn listing_changed(&mut self, listing: &Listing);
    fn detail_changed(&mut self, detail: &RepoDetail);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub base: PathBuf,
    pub entries: Vec<RepoEntry>,
    pub selected: Option<String>,
}

impl Listing {
    pub fn find(&self, name: &str) -> Option<&RepoEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Select `name` if it is listed; returns whether it was
    pub fn select(&mut self, name: &str) -> bool {
        if self.find(name).is_some() {
            self.selected = Some(name.to_string());
            true
        } else {
            false
        }
    }
}

pub struct Reconciler<'a> {
    inspector: &'a dyn RepoInspector,
}

impl<'a> Reconciler<'a> {
    pub fn new(inspector: &'a dyn RepoInspector) -> Self {
        Self { inspector }
    }

    /// Sorted repositories under `base` with their cached visibility
    pub fn refresh_listing(
        &self,
        base: &Path,
        cache: &StatusCache,
        observer: &mut dyn ViewObserver,
    ) -> Result<Listing> {
        let entries = list_repositories(base)?
            .into_iter()
            .map(|(name, path)| {
                let visibility = cache.visibility(&path);
                RepoEntry {
                    name,
                    path,
                    visibility,
                }
            })
            .collect();
        let listing = Listing {
            base: base.to_path_buf(),
            entries,
            selected: None,
        };
        observer.listing_changed(&listing);
        Ok(listing)
    }

    pub fn refresh_detail(&self, repo: &Path, observer: &mut dyn ViewObserver) -> RepoDetail {
        let detail = self.inspector.detail(repo);
        observer.detail_changed(&detail);
        detail
    }

    /// Apply one deferred refresh to `listing`
    pub fn apply<V>(
        &self,
        request: &RefreshRequest,
        base: &Path,
        cache: &mut StatusCache,
        source: &V,
        listing: &mut Listing,
        observer: &mut dyn ViewObserver,
    ) -> Result<()>
    where
        V: VisibilitySource + ?Sized,
    {
        log::debug!("Applying {request:?}");
        if request.rescan {
            let added = cache.refresh_missing(base, source)?;
            if added > 0 {
                log::info!("Cached visibility for {added} new repositories");
            }
            let previous = listing.selected.take();
            *listing = self.refresh_listing(base, cache, observer)?;
            if let Some(previous) = previous {
                listing.select(&previous);
            }
        }

        if let Some(name) = &request.select {
            if !listing.select(name) {
                log::debug!("'{name}' is not listed yet");
            }
        }

        if let Some(repo) = &request.repo {
            if repo.is_dir() {
                self.refresh_detail(repo, observer);
            }
        }
        Ok(())
    }

    /// Wait for every queued refresh and apply it once due. A refresh that
    /// fails is logged and skipped. Returns how many were applied.
    pub async fn run_deferred<V>(
        &self,
        queue: &mut RefreshQueue,
        base: &Path,
        cache: &mut StatusCache,
        source: &V,
        listing: &mut Listing,
        observer: &mut dyn ViewObserver,
    ) -> usize
    where
        V: VisibilitySource + ?Sized,
    {
        let mut applied = 0;
        while let Some(deadline) = queue.next_deadline() {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
            for request in queue.take_due(std::time::Instant::now()) {
                match self.apply(&request, base, cache, source, listing, observer) {
                    Ok(()) => applied += 1,
                    Err(e) => log::warn!("Deferred refresh failed: {e}"),
                }
            }
        }
        applied
    }

    /// Drop the cache and query every repository again, pausing
    /// `step_delay` between repositories so the listing fills in as it goes
    pub async fn rebuild_from_scratch<V>(
        &self,
        base: &Path,
        cache: &mut StatusCache,
        source: &V,
        observer: &mut dyn ViewObserver,
        step_delay: Duration,
    ) -> Result<Listing>
    where
        V: VisibilitySource + ?Sized,
    {
        let mut scan = cache.begin_rebuild(base)?;
        let mut listing = Listing {
            base: base.to_path_buf(),
            ..Listing::default()
        };

        while let Some((path, is_private)) = scan.step(cache, source) {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            listing.entries.push(RepoEntry {
                name,
                path,
                visibility: Visibility::from_private(is_private),
            });
            observer.listing_changed(&listing);

            if scan.remaining() > 0 {
                tokio::time::sleep(step_delay).await;
            }
        }

        let queried = scan.finish(cache)?;
        log::info!("Rebuilt visibility for {queried} repositories");
        Ok(listing)
    }
}
