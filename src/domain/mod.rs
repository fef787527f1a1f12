//! Domain layer for the live-event backend.
//!
//! This module contains business entities, value objects and the store
//! traits, independent of transport DTOs and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod store;
pub mod value_object;

pub use entity::{ChatMessage, ConnectedIdentity, ViewerPresence};
pub use error::{StoreError, ValueObjectError};
pub use store::{MessageStore, ViewerStore};
pub use value_object::{DisplayName, MessageBody, SessionId};
