//! Live-event companion server binary.
//!
//! Run with:
//! ```not_rust
//! ADMIN_SECRET=... API_KEY=... cargo run --bin aovivo-server
//! ```

use clap::Parser;

use aovivo_server::common::logger::setup_logger;
use aovivo_server::config::Config;

#[tokio::main]
async fn main() {
    // Missing secrets abort here, before anything is served
    let config = Config::parse();

    setup_logger(env!("CARGO_BIN_NAME"), "info");

    if let Err(e) = aovivo_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
