//! Usecase: validate, persist and hand back a chat message for broadcast.
//!
//! The pipeline for an inbound message event is:
//! 1. the caller rejects silently when the connection was never admitted;
//! 2. trim; an empty body is dropped silently (`Ok(None)`);
//! 3. an over-long body is rejected with a targeted error;
//! 4. persist; on store failure nothing is broadcast;
//! 5. on success the stored message is returned for broadcast to all.

use std::sync::Arc;

use crate::common::time::now_utc;
use crate::domain::{ChatMessage, ConnectedIdentity, MessageBody, MessageStore, ValueObjectError};

use super::error::SendMessageError;

/// Number of messages replayed to a joining connection.
pub const HISTORY_REPLAY_LIMIT: usize = 50;

pub struct SendMessageUseCase {
    store: Arc<dyn MessageStore>,
}

impl SendMessageUseCase {
    /// Create a new SendMessageUseCase over the given message store.
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a message from an admitted connection.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(message))` - persisted; broadcast it to all connections
    /// * `Ok(None)` - body empty after trimming; drop silently
    /// * `Err(SendMessageError)` - reject with a targeted error notice
    pub async fn execute(
        &self,
        identity: &ConnectedIdentity,
        raw_body: &str,
    ) -> Result<Option<ChatMessage>, SendMessageError> {
        let body = match MessageBody::parse(raw_body) {
            Ok(body) => body,
            Err(ValueObjectError::MessageBodyEmpty) => return Ok(None),
            Err(ValueObjectError::MessageBodyTooLong { max, actual }) => {
                return Err(SendMessageError::TooLong { max, actual });
            }
            // MessageBody::parse has no other failure modes
            Err(_) => return Ok(None),
        };

        let message = ChatMessage::new(
            identity.session_id.clone(),
            identity.display_name.clone(),
            identity.email.clone(),
            body.into_string(),
            now_utc(),
        );

        self.store.insert(message.clone()).await?;

        Ok(Some(message))
    }

    /// The most recent messages in chronological order, for history replay
    /// on join.
    pub async fn recent_history(&self) -> Result<Vec<ChatMessage>, SendMessageError> {
        Ok(self.store.recent(HISTORY_REPLAY_LIMIT).await?)
    }

    /// Every stored message, for advisory statistics.
    pub async fn all_messages(&self) -> Result<Vec<ChatMessage>, SendMessageError> {
        Ok(self.store.all().await?)
    }
}
