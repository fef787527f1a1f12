//! Core domain models for the live-event backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_object::{DisplayName, SessionId};

/// A chat message, immutable once created. The only mutation is a hard
/// delete; there is no edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message identifier
    pub id: Uuid,
    /// Session id of the author (client-chosen, correlates with presence)
    pub session_id: String,
    /// Display name of the author at send time
    pub display_name: String,
    /// Optional author email
    pub email: Option<String>,
    /// Message body, 1-500 characters after trimming
    pub body: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new message with a fresh id and the given creation time.
    pub fn new(
        session_id: SessionId,
        display_name: DisplayName,
        email: Option<String>,
        body: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.into_string(),
            display_name: display_name.into_string(),
            email,
            body,
            created_at,
        }
    }
}

/// Durable(ish) record of a viewer, keyed by session id.
///
/// Exactly one row exists per `session_id` at any time (registration is an
/// upsert, not an insert). `watching == true` is necessary but not
/// sufficient for "active": the row must also have recent activity within
/// the liveness window, evaluated at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerPresence {
    /// Row identifier
    pub id: Uuid,
    /// Natural key: client-chosen session id
    pub session_id: String,
    /// Optional display name
    pub display_name: Option<String>,
    /// Optional email
    pub email: Option<String>,
    /// Optional client IP, as reported by the edge proxy
    pub ip: Option<String>,
    /// Optional browser user agent
    pub user_agent: Option<String>,
    /// When this session first registered
    pub entered_at: DateTime<Utc>,
    /// Last registration/heartbeat/leave call for this session
    pub last_activity: DateTime<Utc>,
    /// Whether the client claims to be watching (cleared by `leave`)
    pub watching: bool,
}

/// Ephemeral chat identity bound to one open WebSocket connection.
///
/// Never persisted; lives exactly as long as the connection. Its
/// `session_id` need not have a corresponding [`ViewerPresence`] row - chat
/// join and viewer registration are independent subsystems correlated only
/// by the client-chosen session id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedIdentity {
    /// Server-assigned id of the transport connection
    pub connection_id: Uuid,
    /// Client-chosen session id
    pub session_id: SessionId,
    /// Display name announced at join
    pub display_name: DisplayName,
    /// Optional email announced at join
    pub email: Option<String>,
    /// When the connection joined the chat
    pub joined_at: DateTime<Utc>,
}
