//! Usecase: heartbeat-driven viewer presence.
//!
//! Liveness is inferred purely from recency of activity: a viewer counts as
//! active while `watching == true` and its `last_activity` is strictly
//! within the liveness window, evaluated at call time. Reads never depend on
//! the stale-row sweep having run, because they apply the time filter
//! themselves.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::common::time::now_utc;
use crate::domain::{SessionId, StoreError, ViewerPresence, ViewerStore};

/// Liveness window: a viewer with no activity for this long is no longer
/// counted as active. Applied consistently by the count, the list and the
/// sweep, with the cutoff recomputed at every call.
pub const LIVENESS_WINDOW_SECS: i64 = 2 * 60;

/// Registration payload for [`PresenceTracker::register`].
#[derive(Debug, Clone)]
pub struct RegisterViewer {
    pub session_id: SessionId,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Advisory presence statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ViewerStats {
    pub active: u64,
    pub total: u64,
    pub first_entered_at: Option<DateTime<Utc>>,
    pub last_entered_at: Option<DateTime<Utc>>,
}

/// Owns the registration/heartbeat/leave/expire state transitions over the
/// viewer store.
pub struct PresenceTracker {
    store: Arc<dyn ViewerStore>,
}

impl PresenceTracker {
    /// Create a new tracker over the given store.
    pub fn new(store: Arc<dyn ViewerStore>) -> Self {
        Self { store }
    }

    fn cutoff() -> DateTime<Utc> {
        now_utc() - Duration::seconds(LIVENESS_WINDOW_SECS)
    }

    /// Upsert the viewer row for this session: `last_activity = now`,
    /// `watching = true`. Re-registering refreshes the existing row rather
    /// than duplicating it.
    pub async fn register(&self, input: RegisterViewer) -> Result<ViewerPresence, StoreError> {
        let now = now_utc();
        let row = ViewerPresence {
            id: Uuid::new_v4(),
            session_id: input.session_id.into_string(),
            display_name: input.display_name,
            email: input.email,
            ip: input.ip,
            user_agent: input.user_agent,
            entered_at: now,
            last_activity: now,
            watching: true,
        };
        self.store.upsert(row).await
    }

    /// Bump `last_activity` and set `watching = true` on the existing row.
    ///
    /// A heartbeat for an unknown session is a no-op success: the client may
    /// retry registration on its own schedule and ordering between the two
    /// calls is not guaranteed.
    pub async fn heartbeat(&self, session_id: &str) -> Result<(), StoreError> {
        let touched = self.store.touch(session_id, now_utc(), true).await?;
        if !touched {
            tracing::debug!("Heartbeat for unregistered session '{}'", session_id);
        }
        Ok(())
    }

    /// Mark the session as no longer watching. Leaving still counts as
    /// recent activity; the row is kept until it ages out of the window.
    pub async fn leave(&self, session_id: &str) -> Result<(), StoreError> {
        self.store.touch(session_id, now_utc(), false).await?;
        Ok(())
    }

    /// Number of active viewers right now.
    pub async fn active_count(&self) -> Result<u64, StoreError> {
        self.store.count_active(Self::cutoff()).await
    }

    /// Active viewers right now, most recently entered first.
    pub async fn active_list(&self) -> Result<Vec<ViewerPresence>, StoreError> {
        self.store.active_since(Self::cutoff()).await
    }

    /// Point lookup; `None` is a valid "no record" result.
    pub async fn get(&self, session_id: &str) -> Result<Option<ViewerPresence>, StoreError> {
        self.store.get(session_id).await
    }

    /// Every known viewer row, most recent activity first.
    pub async fn list_all(&self) -> Result<Vec<ViewerPresence>, StoreError> {
        self.store.all().await
    }

    /// Delete rows whose `last_activity` predates the window, regardless of
    /// the `watching` flag. The only deleting operation; safe to run
    /// concurrently with reads.
    pub async fn sweep_stale(&self) -> Result<u64, StoreError> {
        self.store.delete_older_than(Self::cutoff()).await
    }

    /// Advisory statistics. Store failures degrade to zeroed/empty values
    /// rather than failing the request.
    pub async fn stats(&self) -> ViewerStats {
        let active = match self.active_count().await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Failed to count active viewers for stats: {}", e);
                0
            }
        };

        let rows = match self.store.all().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Failed to list viewers for stats: {}", e);
                Vec::new()
            }
        };

        ViewerStats {
            active,
            total: rows.len() as u64,
            first_entered_at: rows.iter().map(|v| v.entered_at).min(),
            last_entered_at: rows.iter().map(|v| v.entered_at).max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::store::MockViewerStore;
    use crate::infrastructure::repository::InMemoryViewerStore;

    fn tracker() -> (PresenceTracker, Arc<InMemoryViewerStore>) {
        let store = Arc::new(InMemoryViewerStore::new());
        (PresenceTracker::new(store.clone()), store)
    }

    fn register_input(session: &str) -> RegisterViewer {
        RegisterViewer {
            session_id: SessionId::new(session.to_string()).unwrap(),
            display_name: None,
            email: None,
            ip: None,
            user_agent: None,
        }
    }

    #[tokio::test]
    async fn test_register_then_active_list_round_trip() {
        // given:
        let (tracker, _) = tracker();

        // when:
        tracker.register(register_input("s1")).await.unwrap();
        let active = tracker.active_list().await.unwrap();

        // then: exactly one row for the session, watching
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].session_id, "s1");
        assert!(active[0].watching);
        assert_eq!(tracker.active_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_twice_keeps_single_row() {
        let (tracker, _) = tracker();

        let first = tracker.register(register_input("s1")).await.unwrap();
        let second = tracker.register(register_input("s1")).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.entered_at, first.entered_at);
        assert_eq!(tracker.active_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_heartbeat_is_idempotent_within_window() {
        // given:
        let (tracker, _) = tracker();
        tracker.register(register_input("s1")).await.unwrap();

        // when: several heartbeats inside one window
        for _ in 0..5 {
            tracker.heartbeat("s1").await.unwrap();
        }

        // then: same observable effect as one
        assert_eq!(tracker.active_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_heartbeat_unknown_session_is_noop_success() {
        let (tracker, _) = tracker();

        let result = tracker.heartbeat("never-registered").await;

        assert!(result.is_ok());
        assert_eq!(tracker.active_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_leave_clears_watching_but_keeps_row() {
        // given:
        let (tracker, _) = tracker();
        tracker.register(register_input("s1")).await.unwrap();

        // when:
        tracker.leave("s1").await.unwrap();

        // then: not active, but the row still exists with recent activity
        assert_eq!(tracker.active_count().await.unwrap(), 0);
        let row = tracker.get("s1").await.unwrap().unwrap();
        assert!(!row.watching);
    }

    #[tokio::test]
    async fn test_stale_row_is_inactive_before_any_sweep() {
        // given: a watching row whose activity predates the window
        let (tracker, store) = tracker();
        let registered = tracker.register(register_input("s1")).await.unwrap();
        let stale = ViewerPresence {
            last_activity: now_utc() - Duration::seconds(LIVENESS_WINDOW_SECS + 1),
            ..registered
        };
        store.upsert(stale).await.unwrap();

        // then: reads apply the time filter themselves
        assert_eq!(tracker.active_count().await.unwrap(), 0);
        assert!(tracker.active_list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sweep_removes_exactly_the_stale_rows() {
        // given: one stale and one fresh session
        let (tracker, store) = tracker();
        let registered = tracker.register(register_input("stale")).await.unwrap();
        store
            .upsert(ViewerPresence {
                last_activity: now_utc() - Duration::seconds(LIVENESS_WINDOW_SECS + 1),
                ..registered
            })
            .await
            .unwrap();
        tracker.register(register_input("fresh")).await.unwrap();

        // when:
        let removed = tracker.sweep_stale().await.unwrap();

        // then:
        assert_eq!(removed, 1);
        assert!(tracker.get("stale").await.unwrap().is_none());
        assert!(tracker.get("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_register_during_sweep_survives() {
        // given: a store with a stale row
        let (tracker, store) = tracker();
        let registered = tracker.register(register_input("stale")).await.unwrap();
        store
            .upsert(ViewerPresence {
                last_activity: now_utc() - Duration::seconds(LIVENESS_WINDOW_SECS + 1),
                ..registered
            })
            .await
            .unwrap();

        // when: a different session registers concurrently with the sweep
        let tracker = Arc::new(tracker);
        let sweep = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.sweep_stale().await })
        };
        tracker.register(register_input("newcomer")).await.unwrap();
        sweep.await.unwrap().unwrap();

        // then: the newcomer survives
        assert!(tracker.get("newcomer").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stats_aggregates_rows() {
        let (tracker, _) = tracker();
        tracker.register(register_input("s1")).await.unwrap();
        tracker.register(register_input("s2")).await.unwrap();
        tracker.leave("s2").await.unwrap();

        let stats = tracker.stats().await;

        assert_eq!(stats.active, 1);
        assert_eq!(stats.total, 2);
        assert!(stats.first_entered_at.is_some());
        assert!(stats.last_entered_at.is_some());
    }

    #[tokio::test]
    async fn test_stats_degrades_to_zero_on_store_error() {
        // given: a store that fails every read
        let mut mock = MockViewerStore::new();
        mock.expect_count_active()
            .returning(|_| Err(StoreError::Unavailable("down".to_string())));
        mock.expect_all()
            .returning(|| Err(StoreError::Unavailable("down".to_string())));
        let tracker = PresenceTracker::new(Arc::new(mock));

        // when:
        let stats = tracker.stats().await;

        // then: advisory counts degrade instead of failing
        assert_eq!(stats.active, 0);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.first_entered_at, None);
    }
}
