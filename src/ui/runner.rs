//! Router assembly and server entry point.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::infrastructure::repository::{InMemoryMessageStore, InMemoryViewerStore};

use super::auth::{require_admin, require_api_key};
use super::handler::http;
use super::handler::websocket_handler;
use super::signal::shutdown_signal;
use super::state::AppState;

/// Build the full application router over the given state.
///
/// Split out from [`run`] so integration tests can serve the same router on
/// an ephemeral port.
pub fn app(state: Arc<AppState>) -> Router {
    // Human-operator actions behind the admin secret header
    let admin_routes = Router::new()
        .route("/api/viewers/ativos", get(http::active_viewers))
        .route("/api/viewers/todos", get(http::all_viewers))
        .route("/api/chat/mensagem/{id}", delete(http::delete_message))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Machine-triggered actions behind the automation key header
    let automation_routes = Router::new()
        .route("/api/viewers/inativos", delete(http::sweep_inactive))
        .route("/api/chat/limpar", post(http::clear_chat))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/api/health", get(http::health_check))
        .route("/api/viewers/registrar", post(http::register_viewer))
        .route("/api/viewers/heartbeat", post(http::heartbeat))
        .route("/api/viewers/sair", post(http::leave))
        .route("/api/viewers/contagem", get(http::viewer_count))
        .route("/api/viewers/estatisticas", get(http::viewer_stats))
        .route("/api/viewers/{session_id}", get(http::get_viewer))
        .route("/api/chat/mensagens", get(http::recent_messages))
        .route("/api/chat/estatisticas", get(http::chat_stats))
        .route("/chat", get(websocket_handler))
        .merge(admin_routes)
        .merge(automation_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until a shutdown signal arrives.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let messages = Arc::new(InMemoryMessageStore::new());
    let viewers = Arc::new(InMemoryViewerStore::new());
    let state = Arc::new(AppState::new(messages, viewers, &config));

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
