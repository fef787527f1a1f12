//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

pub use websocket::websocket_handler;
