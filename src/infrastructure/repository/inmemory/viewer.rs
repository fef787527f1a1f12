//! In-memory ViewerStore implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{StoreError, ViewerPresence, ViewerStore};

/// Viewer presence table backed by a `HashMap` keyed on session id.
///
/// The map key is the natural key, so the one-row-per-session invariant
/// holds by construction.
#[derive(Default)]
pub struct InMemoryViewerStore {
    viewers: Mutex<HashMap<String, ViewerPresence>>,
}

impl InMemoryViewerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ViewerStore for InMemoryViewerStore {
    async fn upsert(&self, row: ViewerPresence) -> Result<ViewerPresence, StoreError> {
        let mut viewers = self.viewers.lock().await;
        let stored = match viewers.get(&row.session_id) {
            // Existing row keeps its identity and first-seen time
            Some(existing) => ViewerPresence {
                id: existing.id,
                entered_at: existing.entered_at,
                ..row
            },
            None => row,
        };
        viewers.insert(stored.session_id.clone(), stored.clone());
        Ok(stored)
    }

    async fn touch(
        &self,
        session_id: &str,
        last_activity: DateTime<Utc>,
        watching: bool,
    ) -> Result<bool, StoreError> {
        let mut viewers = self.viewers.lock().await;
        match viewers.get_mut(session_id) {
            Some(row) => {
                row.last_activity = last_activity;
                row.watching = watching;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get(&self, session_id: &str) -> Result<Option<ViewerPresence>, StoreError> {
        let viewers = self.viewers.lock().await;
        Ok(viewers.get(session_id).cloned())
    }

    async fn count_active(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let viewers = self.viewers.lock().await;
        Ok(viewers
            .values()
            .filter(|v| v.watching && v.last_activity > cutoff)
            .count() as u64)
    }

    async fn active_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<ViewerPresence>, StoreError> {
        let viewers = self.viewers.lock().await;
        let mut active: Vec<ViewerPresence> = viewers
            .values()
            .filter(|v| v.watching && v.last_activity > cutoff)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.entered_at.cmp(&a.entered_at));
        Ok(active)
    }

    async fn all(&self) -> Result<Vec<ViewerPresence>, StoreError> {
        let viewers = self.viewers.lock().await;
        let mut rows: Vec<ViewerPresence> = viewers.values().cloned().collect();
        rows.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        Ok(rows)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut viewers = self.viewers.lock().await;
        let before = viewers.len();
        viewers.retain(|_, v| v.last_activity >= cutoff);
        Ok((before - viewers.len()) as u64)
    }
}
