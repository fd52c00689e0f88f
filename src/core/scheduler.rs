//! Delay-based queue of deferred refreshes.
//!
//! Remote operations such as `gh repo create` are not always visible the
//! moment the local command returns, so the orchestrator does not refresh
//! right away. It schedules a [`RefreshRequest`] here and the reconciler's
//! driver picks each one up once its deadline has passed.

use crate::core::state::RefreshRequest;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Scheduled {
    due: Instant,
    request: RefreshRequest,
}

#[derive(Debug, Default)]
pub struct RefreshQueue {
    pending: Vec<Scheduled>,
}

impl RefreshQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, request: RefreshRequest, delay: Duration) {
        self.schedule_at(request, Instant::now() + delay);
    }

    pub fn schedule_at(&mut self, request: RefreshRequest, due: Instant) {
        log::debug!("Refresh scheduled: {request:?}");
        self.pending.push(Scheduled { due, request });
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|s| s.due).min()
    }

    /// Remove and return everything due at `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<RefreshRequest> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = rest;
        due.sort_by_key(|s| s.due);
        due.into_iter().map(|s| s.request).collect()
    }

    pub fn requests(&self) -> impl Iterator<Item = &RefreshRequest> {
        self.pending.iter().map(|s| &s.request)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_nothing_due_before_deadline() {
        let mut queue = RefreshQueue::new();
        let now = Instant::now();
        queue.schedule_at(RefreshRequest::rescan(), now + Duration::from_secs(1));

        assert!(queue.take_due(now).is_empty());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_deadline(), Some(now + Duration::from_secs(1)));
    }

    #[test]
    fn test_take_due_orders_by_deadline() {
        let mut queue = RefreshQueue::new();
        let now = Instant::now();
        queue.schedule_at(RefreshRequest::rescan(), now + Duration::from_millis(20));
        queue.schedule_at(
            RefreshRequest::detail(Path::new("/work/alpha")),
            now + Duration::from_millis(10),
        );
        queue.schedule_at(RefreshRequest::rescan(), now + Duration::from_secs(60));

        let due = queue.take_due(now + Duration::from_millis(30));
        assert_eq!(due.len(), 2);
        assert_eq!(due[0], RefreshRequest::detail(Path::new("/work/alpha")));
        assert_eq!(due[1], RefreshRequest::rescan());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_empty_queue_has_no_deadline() {
        let queue = RefreshQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.next_deadline(), None);
    }
}
