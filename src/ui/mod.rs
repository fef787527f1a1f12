//! UI layer: HTTP + WebSocket transport, connection registry and fan-out.

pub mod auth;
pub mod broadcast;
pub mod handler;
pub mod registry;
mod runner;
mod signal;
pub mod state;

pub use runner::{app, run};
