//! HTTP API endpoint handlers.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::domain::{ChatMessage, SessionId, ValueObjectError, ViewerPresence};
use crate::infrastructure::dto::http::{
    ChatStatsDto, ErrorResponse, RegisterViewerRequest, SessionRequest, SuccessResponse,
    SweepResponse, ViewerCountResponse,
};
use crate::infrastructure::dto::ws::ServerEvent;
use crate::usecase::{RegisterViewer, ViewerStats};

use super::super::state::AppState;

const EMAIL_MAX_LEN: usize = 255;

/// Handler-level failures mapped onto HTTP responses.
///
/// Store details never leak to clients; they are logged and summarized.
pub enum ApiError {
    Validation(String),
    NotFound(String),
    Store,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Store => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro interno".to_string(),
            ),
        };
        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(e: ValueObjectError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<crate::domain::StoreError> for ApiError {
    fn from(e: crate::domain::StoreError) -> Self {
        tracing::error!("Store error: {}", e);
        ApiError::Store
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

// --- Presence endpoints ---

fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
}

fn optional_field(
    value: Option<String>,
    max: usize,
    field: &str,
) -> Result<Option<String>, ApiError> {
    match value {
        Some(v) => {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if trimmed.chars().count() > max {
                return Err(ApiError::Validation(format!(
                    "{field} cannot exceed {max} characters"
                )));
            }
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}

/// `POST /api/viewers/registrar` - upsert the viewer row for a session.
pub async fn register_viewer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(dto): Json<RegisterViewerRequest>,
) -> Result<(StatusCode, Json<ViewerPresence>), ApiError> {
    let session_id = SessionId::new(dto.session_id)?;
    let input = RegisterViewer {
        session_id,
        display_name: optional_field(dto.display_name, 100, "display_name")?,
        email: optional_field(dto.email, EMAIL_MAX_LEN, "email")?,
        ip: client_ip(&headers),
        user_agent: dto.user_agent,
    };

    let viewer = state.presence.register(input).await?;
    Ok((StatusCode::CREATED, Json(viewer)))
}

/// `POST /api/viewers/heartbeat` - bump activity for a session.
pub async fn heartbeat(
    State(state): State<Arc<AppState>>,
    Json(dto): Json<SessionRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.presence.heartbeat(&dto.session_id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// `POST /api/viewers/sair` - mark a session as no longer watching.
pub async fn leave(
    State(state): State<Arc<AppState>>,
    Json(dto): Json<SessionRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.presence.leave(&dto.session_id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// `GET /api/viewers/contagem` - active viewer count.
///
/// Advisory: degrades to zero when the store is unavailable.
pub async fn viewer_count(State(state): State<Arc<AppState>>) -> Json<ViewerCountResponse> {
    let viewers = match state.presence.active_count().await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Failed to count active viewers: {}", e);
            0
        }
    };
    Json(ViewerCountResponse { viewers })
}

/// `GET /api/viewers/ativos` (admin) - active viewers, newest entry first.
pub async fn active_viewers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ViewerPresence>>, ApiError> {
    Ok(Json(state.presence.active_list().await?))
}

/// `GET /api/viewers/todos` (admin) - every known viewer row.
pub async fn all_viewers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ViewerPresence>>, ApiError> {
    Ok(Json(state.presence.list_all().await?))
}

/// `GET /api/viewers/estatisticas` - advisory presence statistics.
pub async fn viewer_stats(State(state): State<Arc<AppState>>) -> Json<ViewerStats> {
    Json(state.presence.stats().await)
}

/// `GET /api/viewers/{session_id}` - point lookup; `null` when absent.
pub async fn get_viewer(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Option<ViewerPresence>>, ApiError> {
    Ok(Json(state.presence.get(&session_id).await?))
}

/// `DELETE /api/viewers/inativos` (automation key) - sweep stale rows.
pub async fn sweep_inactive(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SweepResponse>, ApiError> {
    let removed = state.presence.sweep_stale().await?;
    tracing::info!("Swept {} stale viewer rows", removed);
    Ok(Json(SweepResponse { removed }))
}

// --- Chat endpoints ---

/// `GET /api/chat/mensagens` - last messages, chronological.
///
/// Advisory read: degrades to an empty list when the store is unavailable.
pub async fn recent_messages(State(state): State<Arc<AppState>>) -> Json<Vec<ChatMessage>> {
    let messages = match state.send_message.recent_history().await {
        Ok(messages) => messages,
        Err(e) => {
            tracing::warn!("Failed to load chat history: {}", e);
            Vec::new()
        }
    };
    Json(messages)
}

/// `GET /api/chat/estatisticas` - message count and unique authors.
pub async fn chat_stats(State(state): State<Arc<AppState>>) -> Json<ChatStatsDto> {
    let messages = match state.send_message.all_messages().await {
        Ok(messages) => messages,
        Err(e) => {
            tracing::warn!("Failed to load messages for stats: {}", e);
            Vec::new()
        }
    };
    let unique: HashSet<&str> = messages.iter().map(|m| m.session_id.as_str()).collect();
    Json(ChatStatsDto {
        total_mensagens: messages.len() as u64,
        usuarios_unicos: unique.len() as u64,
    })
}

/// `DELETE /api/chat/mensagem/{id}` (admin) - delete one message and notify
/// the realtime channel.
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    use crate::usecase::ModerationError;

    match state.moderation.delete_message_unchecked(id).await {
        Ok(()) => {
            state
                .broadcaster
                .broadcast_all(&ServerEvent::MessageDeleted { id })
                .await;
            Ok(StatusCode::NO_CONTENT)
        }
        Err(ModerationError::MessageNotFound) => Err(ApiError::NotFound(
            "Mensagem não encontrada".to_string(),
        )),
        Err(ModerationError::Store(e)) => Err(e.into()),
        // unreachable behind the admin middleware
        Err(ModerationError::Unauthorized) => Err(ApiError::Store),
    }
}

/// `POST /api/chat/limpar` (automation key) - clear every message and
/// notify the realtime channel.
pub async fn clear_chat(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    match state.moderation.clear_chat_unchecked().await {
        Ok(_) => {
            state.broadcaster.broadcast_all(&ServerEvent::Cleared).await;
            Ok(StatusCode::NO_CONTENT)
        }
        Err(crate::usecase::ModerationError::Store(e)) => Err(e.into()),
        Err(_) => Err(ApiError::Store),
    }
}
