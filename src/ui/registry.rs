//! Connection registry: which transport connections are live, and who they
//! are in the chat.
//!
//! The registry owns its concurrency discipline (a mutex-guarded map) and
//! never exposes raw iteration; fan-out works on a snapshot taken under the
//! lock so a connection closing mid-broadcast cannot abort delivery to the
//! rest.

use std::collections::HashMap;

use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use crate::common::time::now_utc;
use crate::domain::{ConnectedIdentity, DisplayName, SessionId};

/// A live connection: its chat identity plus the channel that feeds its
/// socket writer task.
struct Connection {
    identity: ConnectedIdentity,
    sender: mpsc::UnboundedSender<String>,
}

/// In-memory map from open connection to ephemeral chat identity.
///
/// State is lost on process restart by design; clients re-join on
/// reconnect.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<Uuid, Connection>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a chat identity to a connection, overwriting any prior identity
    /// bound to the same connection id.
    ///
    /// Connections sharing a `session_id` are not deduplicated: two tabs
    /// with the same session produce two independent entries, both
    /// receiving broadcasts.
    pub async fn admit(
        &self,
        connection_id: Uuid,
        sender: mpsc::UnboundedSender<String>,
        session_id: SessionId,
        display_name: DisplayName,
        email: Option<String>,
    ) -> ConnectedIdentity {
        let identity = ConnectedIdentity {
            connection_id,
            session_id,
            display_name,
            email,
            joined_at: now_utc(),
        };
        let mut connections = self.connections.lock().await;
        connections.insert(
            connection_id,
            Connection {
                identity: identity.clone(),
                sender,
            },
        );
        identity
    }

    /// Remove a connection, returning its identity if it had joined.
    ///
    /// A connection that was never admitted yields `None`; a
    /// message-before-join race is a no-op here, never a crash.
    pub async fn remove(&self, connection_id: Uuid) -> Option<ConnectedIdentity> {
        let mut connections = self.connections.lock().await;
        connections.remove(&connection_id).map(|c| c.identity)
    }

    /// The identity bound to a connection, if any. A connection absent from
    /// the registry has not joined and may not post messages.
    pub async fn lookup(&self, connection_id: Uuid) -> Option<ConnectedIdentity> {
        let connections = self.connections.lock().await;
        connections.get(&connection_id).map(|c| c.identity.clone())
    }

    /// Number of currently admitted connections.
    pub async fn count(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }

    /// Snapshot of connection ids and senders, for fan-out outside the
    /// lock.
    pub(crate) async fn senders(&self) -> Vec<(Uuid, mpsc::UnboundedSender<String>)> {
        let connections = self.connections.lock().await;
        connections
            .iter()
            .map(|(id, c)| (*id, c.sender.clone()))
            .collect()
    }

    /// Sender for a single connection, for targeted notices.
    pub(crate) async fn sender(&self, connection_id: Uuid) -> Option<mpsc::UnboundedSender<String>> {
        let connections = self.connections.lock().await;
        connections.get(&connection_id).map(|c| c.sender.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str) -> SessionId {
        SessionId::new(id.to_string()).unwrap()
    }

    fn name(n: &str) -> DisplayName {
        DisplayName::new(n.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_admit_lookup_remove_count() {
        // given:
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let conn = Uuid::new_v4();

        // when:
        let identity = registry
            .admit(conn, tx, session("s1"), name("Maria"), None)
            .await;

        // then:
        assert_eq!(identity.connection_id, conn);
        assert_eq!(registry.count().await, 1);
        assert_eq!(registry.lookup(conn).await, Some(identity.clone()));

        let removed = registry.remove(conn).await;
        assert_eq!(removed, Some(identity));
        assert_eq!(registry.count().await, 0);
        assert_eq!(registry.lookup(conn).await, None);
    }

    #[tokio::test]
    async fn test_remove_unknown_connection_is_noop() {
        let registry = ConnectionRegistry::new();

        assert_eq!(registry.remove(Uuid::new_v4()).await, None);
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_admit_overwrites_prior_identity_for_same_connection() {
        // given: a connection that already joined
        let registry = ConnectionRegistry::new();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let conn = Uuid::new_v4();
        registry
            .admit(conn, tx1, session("s1"), name("Maria"), None)
            .await;

        // when: the same connection joins again with a new identity
        registry
            .admit(conn, tx2, session("s1"), name("João"), None)
            .await;

        // then: one entry, carrying the latest identity
        assert_eq!(registry.count().await, 1);
        let identity = registry.lookup(conn).await.unwrap();
        assert_eq!(identity.display_name.as_str(), "João");
    }

    #[tokio::test]
    async fn test_same_session_on_two_connections_keeps_both() {
        // given: two tabs with the same session id
        let registry = ConnectionRegistry::new();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        // when:
        registry
            .admit(Uuid::new_v4(), tx1, session("shared"), name("Maria"), None)
            .await;
        registry
            .admit(Uuid::new_v4(), tx2, session("shared"), name("Maria"), None)
            .await;

        // then: no dedup across connections
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn test_count_tracks_admitted_minus_removed() {
        // given: joins and disconnects interleaved across connections
        let registry = ConnectionRegistry::new();
        let mut conns = Vec::new();
        for i in 0..5 {
            let (tx, _rx) = mpsc::unbounded_channel();
            let conn = Uuid::new_v4();
            registry
                .admit(conn, tx, session(&format!("s{i}")), name("x"), None)
                .await;
            conns.push(conn);
        }
        registry.remove(conns[0]).await;
        registry.remove(conns[3]).await;
        // removing one of them twice changes nothing
        registry.remove(conns[3]).await;

        // then:
        assert_eq!(registry.count().await, 3);
    }
}
