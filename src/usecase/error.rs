//! Usecase layer error definitions.

use thiserror::Error;

use crate::domain::StoreError;

/// Failures of the message pipeline that warrant a targeted notice.
///
/// An empty-after-trim body is not an error: the pipeline drops it silently
/// and no variant exists for it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// Body longer than the limit after trimming
    #[error("Mensagem muito longa (máx. {max} caracteres)")]
    TooLong { max: usize, actual: usize },

    /// Persistence failed; the message was not broadcast
    #[error("Erro ao enviar mensagem")]
    Store(#[from] StoreError),
}

/// Failures of admin-gated moderation actions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModerationError {
    /// Missing or incorrect admin secret; nothing was mutated
    #[error("Não autorizado")]
    Unauthorized,

    /// The targeted message does not exist
    #[error("Mensagem não encontrada")]
    MessageNotFound,

    /// Persistence failed; the event was not broadcast
    #[error("Erro ao executar ação")]
    Store(#[from] StoreError),
}
