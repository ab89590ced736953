//! Usecase error types.

use thiserror::Error;

use crate::domain::StoreError;

/// Why a `send_message` request was rejected. Nothing is persisted or
/// broadcast on any of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("unknown sender '{0}'")]
    UnknownSender(String),
    #[error("message store failure: {0}")]
    Store(#[from] StoreError),
}

/// Why a room entry could not be completed. The membership change itself
/// has already taken effect when this is raised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinRoomError {
    #[error("failed to load message history: {0}")]
    History(#[from] StoreError),
}
