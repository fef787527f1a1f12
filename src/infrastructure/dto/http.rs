//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/viewers/registrar`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterViewerRequest {
    pub session_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// Body of `POST /api/viewers/heartbeat` and `POST /api/viewers/sair`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRequest {
    pub session_id: String,
}

/// Generic acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response of `GET /api/viewers/contagem`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerCountResponse {
    pub viewers: u64,
}

/// Response of `DELETE /api/viewers/inativos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResponse {
    pub removed: u64,
}

/// Response of `GET /api/chat/estatisticas`.
///
/// Field names are part of the wire contract with the existing web client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStatsDto {
    pub total_mensagens: u64,
    pub usuarios_unicos: u64,
}

/// Error body for 4xx/5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
