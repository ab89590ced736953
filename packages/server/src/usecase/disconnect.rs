//! Usecase: connection teardown.

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomId, RoomRegistry, UserId};
use crate::infrastructure::dto::websocket::ServerEvent;

/// Tears a connection down: connection-registry removal, room leave, and
/// the `user_left` broadcast to the remaining members.
///
/// Teardown must be safe to invoke more than once per connection: the
/// registry removal is idempotent, and the broadcast only fires when the
/// room leave actually removed a member.
pub struct DisconnectUseCase {
    rooms: Arc<dyn RoomRegistry>,
    pusher: Arc<dyn MessagePusher>,
}

impl DisconnectUseCase {
    pub fn new(rooms: Arc<dyn RoomRegistry>, pusher: Arc<dyn MessagePusher>) -> Self {
        Self { rooms, pusher }
    }

    pub async fn execute(&self, user_id: &UserId, room_id: &RoomId) {
        self.pusher.unregister_client(user_id).await;

        if !self.rooms.leave(room_id, user_id).await {
            return;
        }

        let event = ServerEvent::user_left(user_id);
        let targets = self.rooms.members(room_id).await;
        if let Err(e) = self.pusher.broadcast(targets, &event.to_json()).await {
            tracing::warn!("failed to broadcast user_left for '{}': {}", user_id, e);
        }
    }
}
