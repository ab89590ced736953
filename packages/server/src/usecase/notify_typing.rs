//! Usecase: typing indicator fan-out.

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomId, RoomRegistry, UserId};
use crate::infrastructure::dto::websocket::ServerEvent;

/// Broadcasts `user_typing` to a room, excluding the originator.
///
/// Typing signals are transient: nothing is persisted, and delivery is
/// best-effort like any other broadcast.
pub struct NotifyTypingUseCase {
    rooms: Arc<dyn RoomRegistry>,
    pusher: Arc<dyn MessagePusher>,
}

impl NotifyTypingUseCase {
    pub fn new(rooms: Arc<dyn RoomRegistry>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { rooms, pusher }
    }

    pub async fn execute(&self, user_id: &UserId, room_id: &RoomId, is_typing: bool) {
        let targets: Vec<UserId> = self
            .rooms
            .members(room_id)
            .await
            .into_iter()
            .filter(|id| id != user_id)
            .collect();

        let event = ServerEvent::user_typing(user_id, is_typing);
        if let Err(e) = self.pusher.broadcast(targets, &event.to_json()).await {
            tracing::warn!("failed to broadcast user_typing for '{}': {}", user_id, e);
        }
    }
}
