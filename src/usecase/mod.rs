//! Usecase layer.
//!
//! Business operations called from the UI layer, operating on the domain
//! through the store traits.

pub mod error;
pub mod moderate_chat;
pub mod send_message;
pub mod track_presence;

pub use error::{ModerationError, SendMessageError};
pub use moderate_chat::ModerateChatUseCase;
pub use send_message::SendMessageUseCase;
pub use track_presence::{PresenceTracker, RegisterViewer, ViewerStats, LIVENESS_WINDOW_SECS};
