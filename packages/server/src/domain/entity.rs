//! Entities of the messaging domain.

use super::value_object::{MessageBody, RoomId, UserId};

/// Who authored a stored message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderType {
    User,
    Admin,
}

impl SenderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderType::User => "user",
            SenderType::Admin => "admin",
        }
    }
}

/// A persisted chat message.
///
/// `id` and `created_at` are assigned by the message store; this subsystem
/// never mints either. `user_id` is `None` for system-authored messages
/// (the support responder).
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: Option<UserId>,
    pub sender_type: SenderType,
    pub sender_name: String,
    pub body: MessageBody,
    pub room_id: RoomId,
    pub is_read: bool,
    pub created_at: i64,
}

/// A message as composed by this subsystem, before the store assigns
/// `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessageDraft {
    pub user_id: Option<UserId>,
    pub sender_type: SenderType,
    pub sender_name: String,
    pub body: MessageBody,
    pub room_id: RoomId,
    pub is_read: bool,
}

/// Minimal profile projection used to resolve a sender's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
}

impl Profile {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Display name denormalized onto messages at write time.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
