//! Cross-cutting utilities shared by all layers.

pub mod logger;
pub mod time;
