//! Shared integration test fixtures.

// Not every test binary uses every fixture
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;

use aovivo_server::config::Config;
use aovivo_server::infrastructure::repository::{InMemoryMessageStore, InMemoryViewerStore};
use aovivo_server::ui::state::AppState;

/// Admin secret configured for test servers.
pub const ADMIN_SECRET: &str = "test-admin-secret";

/// Automation key configured for test servers.
pub const API_KEY: &str = "test-api-key";

/// A server instance bound to an ephemeral port, serving the full router
/// over fresh in-memory stores.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let config = Config {
            port: 0,
            bind_address: "127.0.0.1".to_string(),
            admin_secret: ADMIN_SECRET.to_string(),
            api_key: API_KEY.to_string(),
        };
        let state = Arc::new(AppState::new(
            Arc::new(InMemoryMessageStore::new()),
            Arc::new(InMemoryViewerStore::new()),
            &config,
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let app = aovivo_server::ui::app(state);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/chat", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
