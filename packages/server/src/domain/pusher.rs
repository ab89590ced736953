//! Outbound delivery port: the connection registry plus point-to-point and
//! fan-out event delivery.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::UserId;

/// Channel over which serialized events reach a single connection's
/// outbound pump. Sends never block.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("no live connection for user '{0}'")]
    ClientNotFound(String),
    #[error("failed to push to user '{0}': {1}")]
    PushFailed(String, String),
}

/// Registry of live connections keyed by user identity.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Insert or replace the channel for `user_id`. An existing entry for
    /// the same user is silently superseded; the old connection is not
    /// closed.
    async fn register_client(&self, user_id: UserId, sender: PusherChannel);

    /// Remove the entry if present. Idempotent.
    async fn unregister_client(&self, user_id: &UserId);

    /// Whether a live connection is registered for `user_id`.
    async fn is_connected(&self, user_id: &UserId) -> bool;

    /// Deliver to a single connection.
    async fn push_to(&self, user_id: &UserId, content: &str) -> Result<(), MessagePushError>;

    /// Best-effort fan-out: per-recipient failures are logged and skipped,
    /// never surfaced to the caller, and never stall delivery to the
    /// remaining targets.
    async fn broadcast(&self, targets: Vec<UserId>, content: &str)
    -> Result<(), MessagePushError>;
}
