//! Ports the domain layer consumes for persistence, identity resolution,
//! and room membership.
//!
//! The usecase layer depends on these traits only; the infrastructure
//! layer provides the implementations (dependency inversion).

use async_trait::async_trait;
use thiserror::Error;

use super::entity::{ChatMessage, ChatMessageDraft, Profile};
use super::value_object::{RoomId, UserId};

/// Errors surfaced by the backing stores.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store rejected the write: {0}")]
    Rejected(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable append-only log of chat messages, keyed by room.
///
/// The store is the sole source of message identity and ordering: `append`
/// assigns `id` and `created_at`, and ids are monotonically increasing
/// within a room.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a draft and return the stored record.
    async fn append(&self, draft: ChatMessageDraft) -> Result<ChatMessage, StoreError>;

    /// The most recent `limit` messages for a room, oldest first.
    async fn recent(&self, room_id: &RoomId, limit: usize) -> Result<Vec<ChatMessage>, StoreError>;
}

/// Identity resolution consumed to compute a sender's display name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Look up the profile for a user; `Ok(None)` when the user is unknown.
    async fn profile_of(&self, user_id: &UserId) -> Result<Option<Profile>, StoreError>;
}

/// Room-to-members relation.
///
/// Implementations must never retain an empty room: the entry is deleted
/// the moment its last member leaves. A membership snapshot taken for a
/// broadcast is always consistent with respect to concurrent join/leave.
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Add `user_id` to the room, creating the room if absent.
    async fn join(&self, room_id: RoomId, user_id: UserId);

    /// Remove `user_id` from the room; an emptied room is deleted from the
    /// table. Returns whether the user was actually a member, so callers
    /// can keep leave-side-effects exactly-once. Idempotent.
    async fn leave(&self, room_id: &RoomId, user_id: &UserId) -> bool;

    /// Current members of a room, sorted by user id. Empty when the room
    /// does not exist.
    async fn members(&self, room_id: &RoomId) -> Vec<UserId>;

    /// Every active room with its members.
    async fn snapshot(&self) -> Vec<(RoomId, Vec<UserId>)>;
}
