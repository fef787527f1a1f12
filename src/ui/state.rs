//! Shared application state.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::{MessageStore, ViewerStore};
use crate::usecase::{ModerateChatUseCase, PresenceTracker, SendMessageUseCase};

use super::broadcast::Broadcaster;
use super::registry::ConnectionRegistry;

/// Everything the handlers need, built once at startup.
///
/// Each component takes its store dependency explicitly, so tests can
/// substitute in-memory fakes or mocks.
pub struct AppState {
    /// Live connections and their chat identities
    pub registry: Arc<ConnectionRegistry>,
    /// Fan-out over the registry
    pub broadcaster: Broadcaster,
    /// Message pipeline
    pub send_message: SendMessageUseCase,
    /// Admin-gated moderation actions
    pub moderation: ModerateChatUseCase,
    /// Heartbeat-driven presence
    pub presence: PresenceTracker,
    /// Shared secret for human-operator actions (`x-admin-password`)
    pub admin_secret: String,
    /// Shared secret for machine-triggered actions (`x-api-key`)
    pub api_key: String,
}

impl AppState {
    /// Wire the components over the given stores.
    pub fn new(
        messages: Arc<dyn MessageStore>,
        viewers: Arc<dyn ViewerStore>,
        config: &Config,
    ) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        Self {
            broadcaster: Broadcaster::new(registry.clone()),
            registry,
            send_message: SendMessageUseCase::new(messages.clone()),
            moderation: ModerateChatUseCase::new(messages, config.admin_secret.clone()),
            presence: PresenceTracker::new(viewers),
            admin_secret: config.admin_secret.clone(),
            api_key: config.api_key.clone(),
        }
    }
}
