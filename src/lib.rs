//! Live-event companion backend.
//!
//! Relays chat traffic to every connected viewer in real time over a single
//! WebSocket namespace and tracks, from heartbeat pings, how many viewers are
//! currently watching the stream.

pub mod common;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry point
pub use ui::run;
