//! Shared-secret authorization middleware.
//!
//! Two distinct credentials gate mutation: the admin secret
//! (`x-admin-password` header) for human-operator actions and the
//! automation key (`x-api-key` header) for machine-triggered actions. Both
//! are static process-wide values loaded at startup; see [`crate::config`].
//!
//! Expressed as explicit middleware layers composed per route group, not
//! per-handler checks.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::infrastructure::dto::http::ErrorResponse;

use super::state::AppState;

pub const ADMIN_HEADER: &str = "x-admin-password";
pub const API_KEY_HEADER: &str = "x-api-key";

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
        .into_response()
}

fn header_matches(request: &Request, header: &str, expected: &str) -> bool {
    request
        .headers()
        .get(header)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|provided| provided == expected)
}

/// Require the admin secret header. 401 with a short message otherwise; the
/// guarded action is never reached.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !header_matches(&request, ADMIN_HEADER, &state.admin_secret) {
        tracing::warn!("Rejected request with missing or invalid admin secret");
        return unauthorized("Senha de admin inválida");
    }
    next.run(request).await
}

/// Require the automation key header.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !header_matches(&request, API_KEY_HEADER, &state.api_key) {
        tracing::warn!("Rejected request with missing or invalid API key");
        return unauthorized("API Key inválida");
    }
    next.run(request).await
}
