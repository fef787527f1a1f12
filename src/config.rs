//! Process configuration.
//!
//! Loaded once at startup from CLI arguments and environment variables.
//! The two shared-secret credentials have no default value: starting the
//! server without them is a configuration error, not a per-request failure.

use clap::Parser;

/// Live-event companion server
#[derive(Parser, Clone, Debug)]
#[command(name = "aovivo-server", version, about = "Live chat and viewer presence backend")]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "3001")]
    pub port: u16,

    /// Bind address
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: String,

    /// Admin secret for human-operator actions (delete message, clear chat,
    /// list active viewers). Checked against the `x-admin-password` header
    /// and the `admin_secret` field of moderation chat events.
    #[arg(long, env = "ADMIN_SECRET", hide_env_values = true)]
    pub admin_secret: String,

    /// Automation key for machine-triggered actions (clear chat, sweep stale
    /// viewers). Checked against the `x-api-key` header.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: String,
}
