//! WebSocket connection handler for the chat namespace.
//!
//! Each connection runs two tasks: one draining its outbound channel into
//! the socket, one processing inbound events. When either finishes the
//! other is aborted, the connection is removed from the registry and - if
//! it had joined - `user_left` and `users_online` are broadcast. Graceful
//! and ungraceful disconnects take the same path; the registry cannot
//! distinguish them and does not need to.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::common::time::now_utc;
use crate::domain::{DisplayName, SessionId};
use crate::infrastructure::dto::ws::{ClientEvent, ServerEvent};
use crate::ui::broadcast::encode;
use crate::ui::state::AppState;
use crate::usecase::SendMessageError;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Targeted notice through the connection's own channel, usable before the
/// connection has joined the registry.
fn notify(tx: &mpsc::UnboundedSender<String>, event: &ServerEvent) {
    if let Some(json) = encode(event) {
        let _ = tx.send(json);
    }
}

fn error_notice(tx: &mpsc::UnboundedSender<String>, message: &str) {
    notify(
        tx,
        &ServerEvent::Error {
            message: message.to_string(),
        },
    );
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    tracing::info!("Connection {} opened", connection_id);

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    // Drain the outbound channel into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // Process inbound events
    let recv_state = state.clone();
    let recv_tx = tx.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = stream.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on connection {}: {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_event(&recv_state, connection_id, &recv_tx, &text).await;
                }
                Message::Close(_) => {
                    tracing::debug!("Connection {} requested close", connection_id);
                    break;
                }
                // Ping/pong is handled by the protocol layer
                _ => {}
            }
        }
    });

    // If either task completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Disconnect, graceful or not: announce only if the connection had
    // joined, user_left before the refreshed count
    if let Some(identity) = state.registry.remove(connection_id).await {
        tracing::info!(
            "Connection {} ('{}') disconnected",
            connection_id,
            identity.display_name
        );
        state
            .broadcaster
            .broadcast_all(&ServerEvent::UserLeft {
                display_name: identity.display_name.into_string(),
                timestamp: now_utc(),
            })
            .await;
        state
            .broadcaster
            .broadcast_all(&ServerEvent::UsersOnline {
                count: state.registry.count().await,
            })
            .await;
    } else {
        tracing::debug!("Connection {} closed without joining", connection_id);
    }
}

async fn handle_event(
    state: &Arc<AppState>,
    connection_id: Uuid,
    tx: &mpsc::UnboundedSender<String>,
    text: &str,
) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Malformed event from connection {}: {}", connection_id, e);
            error_notice(tx, "Evento inválido");
            return;
        }
    };

    match event {
        ClientEvent::Join {
            session_id,
            display_name,
            email,
        } => {
            handle_join(state, connection_id, tx, session_id, display_name, email).await;
        }
        ClientEvent::Message { body } => {
            handle_message(state, connection_id, tx, &body).await;
        }
        ClientEvent::DeleteMessage { id, admin_secret } => {
            match state.moderation.delete_message(id, &admin_secret).await {
                Ok(()) => {
                    state
                        .broadcaster
                        .broadcast_all(&ServerEvent::MessageDeleted { id })
                        .await;
                }
                Err(e) => error_notice(tx, &e.to_string()),
            }
        }
        ClientEvent::ClearChat { admin_secret } => {
            match state.moderation.clear_chat(&admin_secret).await {
                Ok(_) => {
                    state.broadcaster.broadcast_all(&ServerEvent::Cleared).await;
                }
                Err(e) => error_notice(tx, &e.to_string()),
            }
        }
        ClientEvent::Typing => {
            if let Some(identity) = state.registry.lookup(connection_id).await {
                state
                    .broadcaster
                    .broadcast_except(
                        connection_id,
                        &ServerEvent::UserTyping {
                            display_name: identity.display_name.into_string(),
                        },
                    )
                    .await;
            }
        }
        ClientEvent::StoppedTyping => {
            if let Some(identity) = state.registry.lookup(connection_id).await {
                state
                    .broadcaster
                    .broadcast_except(
                        connection_id,
                        &ServerEvent::UserStoppedTyping {
                            display_name: identity.display_name.into_string(),
                        },
                    )
                    .await;
            }
        }
    }
}

async fn handle_join(
    state: &Arc<AppState>,
    connection_id: Uuid,
    tx: &mpsc::UnboundedSender<String>,
    session_id: String,
    display_name: Option<String>,
    email: Option<String>,
) {
    let session_id = match SessionId::new(session_id) {
        Ok(id) => id,
        Err(e) => {
            error_notice(tx, &e.to_string());
            return;
        }
    };
    // Empty or missing name falls back to the anonymous default
    let display_name = match DisplayName::new(display_name.unwrap_or_default()) {
        Ok(name) => name,
        Err(e) => {
            error_notice(tx, &e.to_string());
            return;
        }
    };

    tracing::info!(
        "Join on connection {} - session '{}', name '{}'",
        connection_id,
        session_id,
        display_name
    );

    let identity = state
        .registry
        .admit(
            connection_id,
            tx.clone(),
            session_id,
            display_name,
            email,
        )
        .await;

    // Ack to the joiner
    notify(tx, &ServerEvent::Joined { success: true });

    // Fresh count to everyone, joiner included
    state
        .broadcaster
        .broadcast_all(&ServerEvent::UsersOnline {
            count: state.registry.count().await,
        })
        .await;

    // History replay to the joiner only; an unavailable store degrades to
    // an empty history rather than failing the join
    let messages = match state.send_message.recent_history().await {
        Ok(messages) => messages,
        Err(e) => {
            tracing::warn!("Failed to load history for join: {}", e);
            Vec::new()
        }
    };
    notify(tx, &ServerEvent::PreviousMessages { messages });

    // Announce to everyone else
    state
        .broadcaster
        .broadcast_except(
            connection_id,
            &ServerEvent::UserJoined {
                display_name: identity.display_name.into_string(),
                timestamp: identity.joined_at,
            },
        )
        .await;
}

async fn handle_message(
    state: &Arc<AppState>,
    connection_id: Uuid,
    tx: &mpsc::UnboundedSender<String>,
    body: &str,
) {
    // A connection that never joined may not post: silent drop
    let Some(identity) = state.registry.lookup(connection_id).await else {
        tracing::debug!(
            "Dropped message from connection {} before join",
            connection_id
        );
        return;
    };

    match state.send_message.execute(&identity, body).await {
        Ok(Some(message)) => {
            tracing::debug!(
                "Message {} from session '{}' accepted",
                message.id,
                message.session_id
            );
            state
                .broadcaster
                .broadcast_all(&ServerEvent::Message(message))
                .await;
        }
        // Empty after trim: dropped without error or broadcast
        Ok(None) => {}
        Err(e @ SendMessageError::TooLong { .. }) => {
            error_notice(tx, &e.to_string());
        }
        Err(SendMessageError::Store(e)) => {
            tracing::error!("Failed to persist message: {}", e);
            error_notice(tx, "Erro ao enviar mensagem");
        }
    }
}
