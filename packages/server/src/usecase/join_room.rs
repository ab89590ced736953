//! Usecase: room entry and room switching.

use std::sync::Arc;

use crate::domain::{MessagePusher, MessageStore, RoomId, RoomRegistry, UserId};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::error::JoinRoomError;

/// Enters a connection into a room: membership, presence broadcasts, and
/// the point-to-point history push.
///
/// A room switch is a full re-entry: the previous room is left first (with
/// its leave-side-effects), then the new room is joined and a fresh
/// history is pushed.
pub struct JoinRoomUseCase {
    store: Arc<dyn MessageStore>,
    rooms: Arc<dyn RoomRegistry>,
    pusher: Arc<dyn MessagePusher>,
    /// Upper bound on the history push after a join.
    history_limit: usize,
}

impl JoinRoomUseCase {
    pub fn new(
        store: Arc<dyn MessageStore>,
        rooms: Arc<dyn RoomRegistry>,
        pusher: Arc<dyn MessagePusher>,
        history_limit: usize,
    ) -> Self {
        Self {
            store,
            rooms,
            pusher,
            history_limit,
        }
    }

    /// Enter `room_id`, leaving `previous` first when given.
    ///
    /// Side effects, in order: `user_left` to the previous room's remaining
    /// members, membership move, `user_joined` to the new room's other
    /// members, `message_history` (most recent N, oldest first) to the
    /// joining connection only.
    ///
    /// A history fetch failure is reported to the caller; the membership
    /// change stands.
    pub async fn execute(
        &self,
        user_id: &UserId,
        previous: Option<&RoomId>,
        room_id: &RoomId,
    ) -> Result<(), JoinRoomError> {
        if let Some(previous) = previous {
            self.leave_room(user_id, previous).await;
        }

        self.rooms.join(room_id.clone(), user_id.clone()).await;

        let joined = ServerEvent::user_joined(user_id);
        let targets = self.other_members(room_id, user_id).await;
        if let Err(e) = self.pusher.broadcast(targets, &joined.to_json()).await {
            tracing::warn!("failed to broadcast user_joined for '{}': {}", user_id, e);
        }

        let history = self.store.recent(room_id, self.history_limit).await?;
        let event = ServerEvent::message_history(history);
        if let Err(e) = self.pusher.push_to(user_id, &event.to_json()).await {
            // The joiner can be gone already; history is best-effort.
            tracing::warn!("failed to push history to '{}': {}", user_id, e);
        }

        Ok(())
    }

    /// Remove `user_id` from `room_id`, notifying the remaining members.
    /// Leaving a room the user is not in is a no-op; an emptied room is
    /// dropped from the table and the `user_left` event with it.
    pub async fn leave_room(&self, user_id: &UserId, room_id: &RoomId) {
        if !self.rooms.leave(room_id, user_id).await {
            return;
        }

        let event = ServerEvent::user_left(user_id);
        let targets = self.rooms.members(room_id).await;
        if let Err(e) = self.pusher.broadcast(targets, &event.to_json()).await {
            tracing::warn!("failed to broadcast user_left for '{}': {}", user_id, e);
        }
    }

    async fn other_members(&self, room_id: &RoomId, exclude: &UserId) -> Vec<UserId> {
        self.rooms
            .members(room_id)
            .await
            .into_iter()
            .filter(|id| id != exclude)
            .collect()
    }
}
