//! Usecase: admin-gated moderation actions.
//!
//! Both actions authorize before touching the store and the caller
//! broadcasts only after the store confirms success - never announce state
//! that was not committed.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::MessageStore;

use super::error::ModerationError;

pub struct ModerateChatUseCase {
    store: Arc<dyn MessageStore>,
    admin_secret: String,
}

impl ModerateChatUseCase {
    /// Create a new ModerateChatUseCase with the configured admin secret.
    pub fn new(store: Arc<dyn MessageStore>, admin_secret: String) -> Self {
        Self {
            store,
            admin_secret,
        }
    }

    fn authorize(&self, provided_secret: &str) -> Result<(), ModerationError> {
        if provided_secret != self.admin_secret {
            return Err(ModerationError::Unauthorized);
        }
        Ok(())
    }

    /// Delete one message. On success the caller broadcasts
    /// `message_deleted {id}` to all connections.
    pub async fn delete_message(
        &self,
        id: Uuid,
        provided_secret: &str,
    ) -> Result<(), ModerationError> {
        self.authorize(provided_secret)?;
        self.delete_message_unchecked(id).await
    }

    /// Delete one message on behalf of a caller that was already authorized
    /// (the HTTP routes check the admin header in middleware before
    /// reaching here).
    pub async fn delete_message_unchecked(&self, id: Uuid) -> Result<(), ModerationError> {
        let deleted = self.store.delete(id).await?;
        if !deleted {
            return Err(ModerationError::MessageNotFound);
        }

        tracing::info!("Message {} deleted by admin", id);
        Ok(())
    }

    /// Delete every message. On success the caller broadcasts `cleared` to
    /// all connections. Returns how many rows were removed.
    pub async fn clear_chat(&self, provided_secret: &str) -> Result<u64, ModerationError> {
        self.authorize(provided_secret)?;
        self.clear_chat_unchecked().await
    }

    /// Clear the chat on behalf of a caller that was already authorized.
    pub async fn clear_chat_unchecked(&self) -> Result<u64, ModerationError> {
        let removed = self.store.clear().await?;
        tracing::info!("Chat cleared by admin ({} messages removed)", removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::now_utc;
    use crate::domain::{ChatMessage, DisplayName, SessionId};
    use crate::infrastructure::repository::InMemoryMessageStore;

    const SECRET: &str = "segredo";

    async fn store_with_message() -> (Arc<InMemoryMessageStore>, Uuid) {
        let store = Arc::new(InMemoryMessageStore::new());
        let message = ChatMessage::new(
            SessionId::new("s1".to_string()).unwrap(),
            DisplayName::new("Maria".to_string()).unwrap(),
            None,
            "olá".to_string(),
            now_utc(),
        );
        let id = message.id;
        store.insert(message).await.unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn test_delete_message_with_valid_secret() {
        let (store, id) = store_with_message().await;
        let usecase = ModerateChatUseCase::new(store.clone(), SECRET.to_string());

        let result = usecase.delete_message(id, SECRET).await;

        assert!(result.is_ok());
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_message_wrong_secret_mutates_nothing() {
        // given:
        let (store, id) = store_with_message().await;
        let usecase = ModerateChatUseCase::new(store.clone(), SECRET.to_string());

        // when:
        let result = usecase.delete_message(id, "errado").await;

        // then: rejected before any store call
        assert_eq!(result.unwrap_err(), ModerationError::Unauthorized);
        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_message_reports_not_found() {
        let (store, _) = store_with_message().await;
        let usecase = ModerateChatUseCase::new(store, SECRET.to_string());

        let result = usecase.delete_message(Uuid::new_v4(), SECRET).await;

        assert_eq!(result.unwrap_err(), ModerationError::MessageNotFound);
    }

    #[tokio::test]
    async fn test_clear_chat_with_valid_secret() {
        let (store, _) = store_with_message().await;
        let usecase = ModerateChatUseCase::new(store.clone(), SECRET.to_string());

        let removed = usecase.clear_chat(SECRET).await.unwrap();

        assert_eq!(removed, 1);
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_chat_wrong_secret_rejected() {
        let (store, _) = store_with_message().await;
        let usecase = ModerateChatUseCase::new(store.clone(), SECRET.to_string());

        let result = usecase.clear_chat("").await;

        assert_eq!(result.unwrap_err(), ModerationError::Unauthorized);
        assert_eq!(store.all().await.unwrap().len(), 1);
    }
}
