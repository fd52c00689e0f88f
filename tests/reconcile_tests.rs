use repo_deck::commands::{Listing, Reconciler};
use repo_deck::core::{
    git::Git2Inspector, HeadState, RefreshQueue, RefreshRequest, Settings, StatusCache, Visibility,
};
use repo_deck::AppContext;
use std::time::{Duration, Instant};

mod common;
use common::{fakes::*, repository::*};

#[cfg(test)]
mod listing_tests {
    use super::*;

    #[test]
    fn test_listing_has_repositories_only() -> anyhow::Result<()> {
        let base = setup_alpha_beta()?;
        base.add_marker_repo("Zeta")?;
        let mut cache = StatusCache::load(base.cache_file());
        cache.upsert(&base.repo_path("alpha"), true)?;
        let inspector = FakeInspector::default();
        let mut observer = RecordingObserver::default();

        let listing = Reconciler::new(&inspector).refresh_listing(base.path(), &cache, &mut observer)?;

        assert_eq!(observer.last_listing_names(), vec!["Zeta", "alpha"]);
        assert_eq!(
            listing.find("alpha").map(|e| e.visibility),
            Some(Visibility::Private)
        );
        // not in the cache yet, shown as public
        assert_eq!(
            listing.find("Zeta").map(|e| e.visibility),
            Some(Visibility::Public)
        );
        assert!(listing.find("beta").is_none());
        Ok(())
    }

    #[test]
    fn test_detail_from_real_repository() -> anyhow::Result<()> {
        let base = setup_base()?;
        let repo = base.add_git_repo("alpha")?;
        create_file(&repo, "notes.txt", "draft")?;
        let inspector = Git2Inspector::new();
        let mut observer = RecordingObserver::default();

        let detail = Reconciler::new(&inspector).refresh_detail(&repo, &mut observer);

        assert_eq!(detail.head, HeadState::Branch("main".to_string()));
        assert_eq!(detail.branches, vec!["main"]);
        assert_eq!(detail.summary.untracked, 1);
        assert_eq!(
            detail.last_commit.as_ref().map(|c| c.summary.as_str()),
            Some("Initial commit")
        );
        assert_eq!(observer.details.len(), 1);
        Ok(())
    }

    #[test]
    fn test_detail_of_broken_repository_is_unknown() -> anyhow::Result<()> {
        let base = setup_base()?;
        let path = base.add_marker_repo("alpha")?;
        let mut observer = RecordingObserver::default();

        let detail = Reconciler::new(&Git2Inspector::new()).refresh_detail(&path, &mut observer);

        assert_eq!(detail.head, HeadState::Unknown);
        assert!(detail.branches.is_empty());
        Ok(())
    }
}

#[cfg(test)]
mod deferred_tests {
    use super::*;

    #[tokio::test]
    async fn test_run_deferred_applies_in_order() -> anyhow::Result<()> {
        let base = setup_alpha_beta()?;
        base.add_marker_repo("gamma")?;
        let mut cache = StatusCache::load(base.cache_file());
        cache.upsert(&base.repo_path("alpha"), false)?;
        let hosting = FakeHosting::default().with_private("gamma");
        let inspector = FakeInspector::default();
        let mut observer = RecordingObserver::default();
        let mut listing = Listing::default();

        let now = Instant::now();
        let mut queue = RefreshQueue::new();
        queue.schedule_at(
            RefreshRequest::created(base.path(), "gamma"),
            now + Duration::from_millis(20),
        );
        queue.schedule_at(
            RefreshRequest::detail(&base.repo_path("alpha")),
            now + Duration::from_millis(5),
        );

        let applied = Reconciler::new(&inspector)
            .run_deferred(&mut queue, base.path(), &mut cache, &hosting, &mut listing, &mut observer)
            .await;

        assert_eq!(applied, 2);
        assert!(queue.is_empty());
        assert!(Instant::now() >= now + Duration::from_millis(20));
        assert_eq!(
            observer
                .details
                .iter()
                .map(|d| d.path.clone())
                .collect::<Vec<_>>(),
            vec![base.repo_path("alpha"), base.repo_path("gamma")]
        );
        assert_eq!(listing.selected.as_deref(), Some("gamma"));
        assert_eq!(cache.get(&base.repo_path("gamma")), Some(true));
        // alpha was already cached and is not queried again
        assert_eq!(hosting.queries.borrow().as_slice(), [base.repo_path("gamma")]);
        Ok(())
    }

    #[tokio::test]
    async fn test_run_deferred_on_empty_queue_returns_immediately() -> anyhow::Result<()> {
        let base = setup_base()?;
        let mut cache = StatusCache::load(base.cache_file());
        let mut queue = RefreshQueue::new();

        let applied = Reconciler::new(&FakeInspector::default())
            .run_deferred(
                &mut queue,
                base.path(),
                &mut cache,
                &FakeHosting::default(),
                &mut Listing::default(),
                &mut RecordingObserver::default(),
            )
            .await;

        assert_eq!(applied, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_refresh_is_skipped_and_rest_of_batch_applies() -> anyhow::Result<()> {
        let base = setup_alpha_beta()?;
        create_file(base.state_dir.path(), "blocker", "not a directory")?;
        let mut cache = StatusCache::load(base.state_dir.path().join("blocker/repo_status.json"));
        let inspector = FakeInspector::default();
        let mut observer = RecordingObserver::default();
        let mut listing = Listing::default();

        let now = Instant::now();
        let mut queue = RefreshQueue::new();
        // alpha is not cached, so the rescan has to write the unwritable cache
        queue.schedule_at(RefreshRequest::rescan(), now);
        queue.schedule_at(RefreshRequest::detail(&base.repo_path("alpha")), now);

        let applied = Reconciler::new(&inspector)
            .run_deferred(
                &mut queue,
                base.path(),
                &mut cache,
                &FakeHosting::default(),
                &mut listing,
                &mut observer,
            )
            .await;

        assert_eq!(applied, 1);
        assert!(queue.is_empty());
        assert_eq!(observer.details.len(), 1);
        assert_eq!(observer.details[0].path, base.repo_path("alpha"));
        Ok(())
    }

    #[tokio::test]
    async fn test_rebuild_fills_listing_one_repository_at_a_time() -> anyhow::Result<()> {
        let base = setup_alpha_beta()?;
        base.add_marker_repo("gamma")?;
        let mut cache = StatusCache::load(base.cache_file());
        cache.upsert(&base.repo_path("vanished"), true)?;
        let hosting = FakeHosting::default().with_private("gamma");
        let mut observer = RecordingObserver::default();

        let listing = Reconciler::new(&FakeInspector::default())
            .rebuild_from_scratch(
                base.path(),
                &mut cache,
                &hosting,
                &mut observer,
                Duration::from_millis(1),
            )
            .await?;

        let sizes: Vec<usize> = observer.listings.iter().map(|l| l.entries.len()).collect();
        assert_eq!(sizes, vec![1, 2]);
        assert_eq!(
            listing.entries.iter().map(|e| e.visibility).collect::<Vec<_>>(),
            vec![Visibility::Public, Visibility::Private]
        );
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&base.repo_path("vanished")), None);
        assert_eq!(StatusCache::load(base.cache_file()).len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_app_settles_after_rename() -> anyhow::Result<()> {
        let base = setup_base()?;
        base.add_marker_repo("alpha")?;
        let mut cache = StatusCache::load(base.cache_file());
        cache.upsert(&base.repo_path("alpha"), true)?;
        let settings = Settings {
            refresh_delay_ms: 1,
            ..Settings::default()
        };

        let mut app = AppContext::with_collaborators(
            settings,
            base.path().to_path_buf(),
            cache,
            Box::new(SpyRunner::default()),
            Box::new(ScriptedPrompter::new().text("gamma").accept()),
            Box::new(FakeInspector::default()),
            Box::new(FakeHosting::default()),
        );
        let mut observer = RecordingObserver::default();

        app.orchestrator().rename("alpha")?;
        assert_eq!(app.queue.len(), 1);
        let applied = app.settle(&mut observer).await;

        assert_eq!(applied, 1);
        assert_eq!(app.listing.selected.as_deref(), Some("gamma"));
        assert_eq!(
            app.listing.find("gamma").map(|e| e.visibility),
            Some(Visibility::Private)
        );
        assert_eq!(
            observer.details.last().map(|d| d.path.clone()),
            Some(base.repo_path("gamma"))
        );
        Ok(())
    }
}
