//! Store traits abstracting the external persistence layer.
//!
//! The usecase layer depends on these traits, not on a concrete store. Each
//! component receives its store as an explicit constructor argument so tests
//! can substitute an in-memory fake or a mock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::entity::{ChatMessage, ViewerPresence};
use super::error::StoreError;

/// Append-only chat message store with hard delete.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a message.
    async fn insert(&self, message: ChatMessage) -> Result<(), StoreError>;

    /// The most recent `limit` messages, in chronological order.
    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError>;

    /// Delete one message by id. Returns `false` when no such row exists.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Delete every message, returning how many were removed.
    async fn clear(&self) -> Result<u64, StoreError>;

    /// All messages, chronological. Source for advisory statistics only.
    async fn all(&self) -> Result<Vec<ChatMessage>, StoreError>;
}

/// Viewer presence store keyed by session id.
///
/// Each mutation is a single atomic row operation at the store level; no
/// in-process transaction spans multiple rows. Two near-simultaneous
/// heartbeats for one session may apply in either order - last write wins on
/// `last_activity`, which advances monotonically in practice.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ViewerStore: Send + Sync {
    /// Insert-or-update keyed on `session_id`.
    ///
    /// When a row for the session already exists, its `id` and `entered_at`
    /// are preserved and the remaining fields are taken from `row`. Returns
    /// the resulting row.
    async fn upsert(&self, row: ViewerPresence) -> Result<ViewerPresence, StoreError>;

    /// Set `last_activity` and `watching` on the row for `session_id`.
    ///
    /// Returns `false` when no row exists (the caller treats that as a
    /// no-op success).
    async fn touch(
        &self,
        session_id: &str,
        last_activity: DateTime<Utc>,
        watching: bool,
    ) -> Result<bool, StoreError>;

    /// Point lookup by session id. Absence is a valid result, not an error.
    async fn get(&self, session_id: &str) -> Result<Option<ViewerPresence>, StoreError>;

    /// Count rows with `watching == true` and `last_activity` strictly
    /// newer than `cutoff`.
    async fn count_active(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;

    /// Rows with `watching == true` and `last_activity` strictly newer than
    /// `cutoff`, ordered by `entered_at` descending.
    async fn active_since(&self, cutoff: DateTime<Utc>)
        -> Result<Vec<ViewerPresence>, StoreError>;

    /// Every row, ordered by `last_activity` descending.
    async fn all(&self) -> Result<Vec<ViewerPresence>, StoreError>;

    /// Delete rows with `last_activity` older than `cutoff`, regardless of
    /// the `watching` flag. Returns how many were removed.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;
}
