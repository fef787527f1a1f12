//! In-memory MessageStore implementation.

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{ChatMessage, MessageStore, StoreError};

/// Append-only message log backed by a `Vec`.
///
/// Messages are kept in insertion order, which is chronological because
/// `created_at` is assigned before insertion from a single clock.
#[derive(Default)]
pub struct InMemoryMessageStore {
    messages: Mutex<Vec<ChatMessage>>,
}

impl InMemoryMessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, message: ChatMessage) -> Result<(), StoreError> {
        let mut messages = self.messages.lock().await;
        messages.push(message);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self.messages.lock().await;
        let start = messages.len().saturating_sub(limit);
        Ok(messages[start..].to_vec())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut messages = self.messages.lock().await;
        let before = messages.len();
        messages.retain(|m| m.id != id);
        Ok(messages.len() < before)
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let mut messages = self.messages.lock().await;
        let removed = messages.len() as u64;
        messages.clear();
        Ok(removed)
    }

    async fn all(&self) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self.messages.lock().await;
        Ok(messages.clone())
    }
}
