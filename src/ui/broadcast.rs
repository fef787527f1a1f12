//! Broadcast router: fans server events out to open connections.
//!
//! Delivery is best-effort and fire-and-forget per connection: every
//! connection has its own unbounded channel feeding its socket writer task,
//! so a slow or closed connection never blocks delivery to the others.
//! Per-connection FIFO follows from the channel; there is no
//! cross-connection ordering guarantee.

use std::sync::Arc;

use uuid::Uuid;

use crate::infrastructure::dto::ws::ServerEvent;

use super::registry::ConnectionRegistry;

/// Serialize a server event for the wire.
///
/// Serialization of these enums cannot fail in practice; a failure is
/// logged and the event is skipped rather than crashing the fan-out.
pub(crate) fn encode(event: &ServerEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize server event: {}", e);
            None
        }
    }
}

/// Fan-out over the connection registry.
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    /// Create a broadcaster over the given registry.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Send an event to every open connection.
    pub async fn broadcast_all(&self, event: &ServerEvent) {
        let Some(json) = encode(event) else { return };
        for (id, sender) in self.registry.senders().await {
            if sender.send(json.clone()).is_err() {
                tracing::warn!("Failed to deliver broadcast to connection {}", id);
            }
        }
    }

    /// Send an event to every open connection except the origin (used for
    /// typing indicators, so the typist does not see their own).
    pub async fn broadcast_except(&self, origin: Uuid, event: &ServerEvent) {
        let Some(json) = encode(event) else { return };
        for (id, sender) in self.registry.senders().await {
            if id == origin {
                continue;
            }
            if sender.send(json.clone()).is_err() {
                tracing::warn!("Failed to deliver broadcast to connection {}", id);
            }
        }
    }

    /// Send a targeted notice to exactly one connection.
    pub async fn unicast(&self, connection_id: Uuid, event: &ServerEvent) {
        let Some(json) = encode(event) else { return };
        if let Some(sender) = self.registry.sender(connection_id).await {
            if sender.send(json).is_err() {
                tracing::warn!("Failed to deliver unicast to connection {}", connection_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    use crate::domain::{DisplayName, SessionId};

    async fn admit(
        registry: &ConnectionRegistry,
        session: &str,
    ) -> (Uuid, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = Uuid::new_v4();
        registry
            .admit(
                conn,
                tx,
                SessionId::new(session.to_string()).unwrap(),
                DisplayName::new("Maria".to_string()).unwrap(),
                None,
            )
            .await;
        (conn, rx)
    }

    #[tokio::test]
    async fn test_broadcast_all_reaches_every_connection() {
        // given: two admitted connections
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Broadcaster::new(registry.clone());
        let (_a, mut rx_a) = admit(&registry, "s1").await;
        let (_b, mut rx_b) = admit(&registry, "s2").await;

        // when:
        broadcaster
            .broadcast_all(&ServerEvent::UsersOnline { count: 2 })
            .await;

        // then:
        let msg_a = rx_a.recv().await.unwrap();
        let msg_b = rx_b.recv().await.unwrap();
        assert!(msg_a.contains("users_online"));
        assert_eq!(msg_a, msg_b);
    }

    #[tokio::test]
    async fn test_broadcast_except_skips_origin() {
        // given:
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Broadcaster::new(registry.clone());
        let (origin, mut rx_origin) = admit(&registry, "s1").await;
        let (_other, mut rx_other) = admit(&registry, "s2").await;

        // when:
        broadcaster
            .broadcast_except(
                origin,
                &ServerEvent::UserTyping {
                    display_name: "Maria".to_string(),
                },
            )
            .await;

        // then: the typist does not see their own indicator
        assert!(rx_other.recv().await.unwrap().contains("user_typing"));
        assert!(rx_origin.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unicast_reaches_only_the_target() {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Broadcaster::new(registry.clone());
        let (target, mut rx_target) = admit(&registry, "s1").await;
        let (_other, mut rx_other) = admit(&registry, "s2").await;

        broadcaster
            .unicast(
                target,
                &ServerEvent::Error {
                    message: "oops".to_string(),
                },
            )
            .await;

        assert!(rx_target.recv().await.unwrap().contains("oops"));
        assert!(rx_other.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_connection_does_not_block_the_rest() {
        // given: one connection whose receiver is already gone
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Broadcaster::new(registry.clone());
        let (_dead, rx_dead) = admit(&registry, "s1").await;
        drop(rx_dead);
        let (_live, mut rx_live) = admit(&registry, "s2").await;

        // when:
        broadcaster
            .broadcast_all(&ServerEvent::UsersOnline { count: 2 })
            .await;

        // then: the live connection still gets the event
        assert!(rx_live.recv().await.unwrap().contains("users_online"));
    }
}
