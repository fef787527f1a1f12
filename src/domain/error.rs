//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to value object validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// SessionId validation error
    #[error("SessionId cannot be empty")]
    SessionIdEmpty,

    /// SessionId too long error
    #[error("SessionId cannot exceed {max} characters (got {actual})")]
    SessionIdTooLong { max: usize, actual: usize },

    /// DisplayName too long error
    #[error("DisplayName cannot exceed {max} characters (got {actual})")]
    DisplayNameTooLong { max: usize, actual: usize },

    /// MessageBody empty after trimming (dropped silently by the pipeline)
    #[error("MessageBody is empty after trimming")]
    MessageBodyEmpty,

    /// MessageBody too long error
    #[error("MessageBody cannot exceed {max} characters (got {actual})")]
    MessageBodyTooLong { max: usize, actual: usize },
}

/// Errors raised by the underlying persistence store.
///
/// The store is treated as a black box offering per-row upsert, update,
/// delete and filtered count/select; any failure of those calls surfaces as
/// one of these variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store rejected or failed the operation
    #[error("store operation failed: {0}")]
    OperationFailed(String),

    /// The store is unreachable
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
