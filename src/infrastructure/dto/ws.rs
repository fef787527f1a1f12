//! Realtime channel event DTOs.
//!
//! All traffic on the WebSocket namespace is JSON with an internal `type`
//! tag. Event names are part of the wire contract with the existing web
//! client, which is why `mensagens_anteriores` keeps its original name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ChatMessage;

/// Events sent by clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Enter the chat; must precede any `message`
    Join {
        session_id: String,
        #[serde(default)]
        display_name: Option<String>,
        #[serde(default)]
        email: Option<String>,
    },
    /// Post a chat message
    Message { body: String },
    /// Admin: delete one message
    DeleteMessage { id: Uuid, admin_secret: String },
    /// Admin: delete every message
    ClearChat { admin_secret: String },
    /// Typing indicator on
    Typing,
    /// Typing indicator off
    StoppedTyping,
}

/// Events sent by the server.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Join acknowledgement, unicast to the joining connection
    Joined { success: bool },
    /// Current number of admitted connections, broadcast to all
    UsersOnline { count: usize },
    /// History replay, unicast to the joining connection
    #[serde(rename = "mensagens_anteriores")]
    PreviousMessages { messages: Vec<ChatMessage> },
    /// Someone joined, broadcast to all other connections
    UserJoined {
        display_name: String,
        timestamp: DateTime<Utc>,
    },
    /// A new chat message, broadcast to all
    Message(ChatMessage),
    /// A message was deleted, broadcast to all
    MessageDeleted { id: Uuid },
    /// The whole chat was cleared, broadcast to all
    Cleared,
    /// Typing indicator, broadcast to all except the typist
    UserTyping { display_name: String },
    /// Typing indicator off, broadcast to all except the typist
    UserStoppedTyping { display_name: String },
    /// Someone disconnected, broadcast to all
    UserLeft {
        display_name: String,
        timestamp: DateTime<Utc>,
    },
    /// Targeted notice; the only failure shape chat clients ever see
    Error { message: String },
}
