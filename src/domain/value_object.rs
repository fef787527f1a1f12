//! Value objects for domain models.
//!
//! Value objects are immutable and compared by value. Validation happens at
//! construction so the rest of the system never handles malformed identities
//! or message bodies.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Maximum length of a session id, in characters.
pub const SESSION_ID_MAX_LEN: usize = 100;

/// Maximum length of a display name, in characters.
pub const DISPLAY_NAME_MAX_LEN: usize = 100;

/// Maximum length of a chat message body after trimming, in characters.
pub const MESSAGE_BODY_MAX_LEN: usize = 500;

/// Display name used when a client joins without one.
pub const ANONYMOUS_NAME: &str = "Anônimo";

/// Client-generated opaque identifier correlating a browser tab/session
/// across reconnects. Not a security credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new SessionId.
    ///
    /// # Errors
    ///
    /// Returns an error when the id is empty or longer than
    /// [`SESSION_ID_MAX_LEN`] characters.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::SessionIdEmpty);
        }
        let len = id.chars().count();
        if len > SESSION_ID_MAX_LEN {
            return Err(ValueObjectError::SessionIdTooLong {
                max: SESSION_ID_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name shown next to chat messages and presence events.
///
/// An empty or whitespace-only name falls back to [`ANONYMOUS_NAME`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new DisplayName.
    ///
    /// # Errors
    ///
    /// Returns an error when the name exceeds [`DISPLAY_NAME_MAX_LEN`]
    /// characters.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(Self::anonymous());
        }
        let len = trimmed.chars().count();
        if len > DISPLAY_NAME_MAX_LEN {
            return Err(ValueObjectError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The anonymous fallback name.
    pub fn anonymous() -> Self {
        Self(ANONYMOUS_NAME.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chat message body, trimmed and length-checked.
///
/// The two failure modes are deliberately distinct: an empty-after-trim body
/// is dropped silently by the message pipeline, while an over-long body is
/// answered with a targeted error notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody(String);

impl MessageBody {
    /// Parse a raw body: trim, then validate length.
    ///
    /// # Errors
    ///
    /// * `MessageBodyEmpty` - empty after trimming
    /// * `MessageBodyTooLong` - more than [`MESSAGE_BODY_MAX_LEN`] characters
    ///   after trimming
    pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::MessageBodyEmpty);
        }
        let len = trimmed.chars().count();
        if len > MESSAGE_BODY_MAX_LEN {
            return Err(ValueObjectError::MessageBodyTooLong {
                max: MESSAGE_BODY_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
