//! Usecase: message send, persist-then-broadcast.

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ChatMessageDraft, MessageBody, MessagePusher, MessageStore, ProfileDirectory,
    RoomId, RoomRegistry, SenderType, UserId,
};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::error::SendMessageError;

/// Validates, persists, and fans out a user message.
///
/// The broadcast happens only after the store acknowledged the write: a
/// rejected write means no room member sees anything. Unlike the presence
/// and typing events, `new_message` includes the sender, whose UI relies
/// on the echoed server-assigned `id` and `createdAt`.
pub struct SendMessageUseCase {
    store: Arc<dyn MessageStore>,
    profiles: Arc<dyn ProfileDirectory>,
    rooms: Arc<dyn RoomRegistry>,
    pusher: Arc<dyn MessagePusher>,
}

impl SendMessageUseCase {
    pub fn new(
        store: Arc<dyn MessageStore>,
        profiles: Arc<dyn ProfileDirectory>,
        rooms: Arc<dyn RoomRegistry>,
        pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            store,
            profiles,
            rooms,
            pusher,
        }
    }

    /// Send `raw_body` from `user_id` into `room_id` and return the stored
    /// record.
    pub async fn execute(
        &self,
        user_id: &UserId,
        room_id: &RoomId,
        raw_body: String,
    ) -> Result<ChatMessage, SendMessageError> {
        let body = MessageBody::new(raw_body).map_err(|_| SendMessageError::EmptyMessage)?;

        let profile = self
            .profiles
            .profile_of(user_id)
            .await?
            .ok_or_else(|| SendMessageError::UnknownSender(user_id.to_string()))?;

        let draft = ChatMessageDraft {
            user_id: Some(user_id.clone()),
            sender_type: SenderType::User,
            sender_name: profile.display_name(),
            body,
            room_id: room_id.clone(),
            is_read: false,
        };
        let stored = self.store.append(draft).await?;

        let targets = self.rooms.members(room_id).await;
        let event = ServerEvent::new_message(&stored);
        if let Err(e) = self.pusher.broadcast(targets, &event.to_json()).await {
            tracing::warn!("failed to broadcast new_message {}: {}", stored.id, e);
        }

        Ok(stored)
    }
}
