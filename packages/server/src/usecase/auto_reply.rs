//! Usecase: scripted support replies.

use std::sync::Arc;

use crate::domain::{
    AutoResponder, ChatMessage, ChatMessageDraft, MessagePusher, MessageStore, RoomId,
    RoomRegistry, SenderType, StoreError,
};
use crate::infrastructure::dto::websocket::ServerEvent;

/// Schedules and produces system-authored replies in responder-eligible
/// rooms.
///
/// The reply goes through the same persist-then-broadcast path as a user
/// message, authored with no user id and the `admin` sender type. A room
/// that empties before the delay elapses still gets the reply persisted;
/// the broadcast then has no targets and is dropped.
#[derive(Clone)]
pub struct AutoReplyUseCase {
    store: Arc<dyn MessageStore>,
    rooms: Arc<dyn RoomRegistry>,
    pusher: Arc<dyn MessagePusher>,
    responder: Arc<dyn AutoResponder>,
}

impl AutoReplyUseCase {
    pub fn new(
        store: Arc<dyn MessageStore>,
        rooms: Arc<dyn RoomRegistry>,
        pusher: Arc<dyn MessagePusher>,
        responder: Arc<dyn AutoResponder>,
    ) -> Self {
        Self {
            store,
            rooms,
            pusher,
            responder,
        }
    }

    /// Schedule one reply for `room_id` if the responder covers it.
    /// Fire-and-forget: the spawned task waits out the responder's delay,
    /// then persists and broadcasts.
    pub fn schedule(&self, room_id: &RoomId) {
        if !self.responder.eligible(room_id) {
            return;
        }

        let delay = self.responder.reply_delay();
        let usecase = self.clone();
        let room_id = room_id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match usecase.respond(&room_id).await {
                Ok(stored) => {
                    tracing::debug!("auto-reply {} stored for room '{}'", stored.id, room_id);
                }
                Err(e) => {
                    tracing::warn!("auto-reply for room '{}' failed: {}", room_id, e);
                }
            }
        });
    }

    /// Persist and broadcast one scripted reply.
    pub async fn respond(&self, room_id: &RoomId) -> Result<ChatMessage, StoreError> {
        let draft = ChatMessageDraft {
            user_id: None,
            sender_type: SenderType::Admin,
            sender_name: self.responder.display_name().to_string(),
            body: self.responder.reply_body(),
            room_id: room_id.clone(),
            is_read: false,
        };
        let stored = self.store.append(draft).await?;

        let targets = self.rooms.members(room_id).await;
        let event = ServerEvent::new_message(&stored);
        if let Err(e) = self.pusher.broadcast(targets, &event.to_json()).await {
            tracing::warn!("failed to broadcast auto-reply {}: {}", stored.id, e);
        }

        Ok(stored)
    }
}
