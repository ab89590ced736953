//! In-memory `RoomRegistry` implementation.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RoomId, RoomRegistry, UserId};

/// Room table: room id to the set of member user ids.
///
/// All mutation and iteration happens under one lock, so a membership
/// snapshot taken for a broadcast never observes a half-applied join or
/// leave.
pub struct InMemoryRoomRegistry {
    rooms: Mutex<HashMap<RoomId, HashSet<UserId>>>,
}

impl InMemoryRoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(&self, room_id: RoomId, user_id: UserId) {
        let mut rooms = self.rooms.lock().await;
        let created = !rooms.contains_key(&room_id);
        rooms.entry(room_id.clone()).or_default().insert(user_id.clone());
        if created {
            tracing::debug!("room '{}' created", room_id);
        }
        tracing::debug!("user '{}' joined room '{}'", user_id, room_id);
    }

    async fn leave(&self, room_id: &RoomId, user_id: &UserId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let Some(members) = rooms.get_mut(room_id) else {
            return false;
        };
        let removed = members.remove(user_id);
        if members.is_empty() {
            // Rooms are never retained empty.
            rooms.remove(room_id);
            tracing::debug!("room '{}' emptied and removed", room_id);
        }
        if removed {
            tracing::debug!("user '{}' left room '{}'", user_id, room_id);
        }
        removed
    }

    async fn members(&self, room_id: &RoomId) -> Vec<UserId> {
        let rooms = self.rooms.lock().await;
        let mut members: Vec<UserId> = rooms
            .get(room_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();

        // Sort by user id for consistent ordering
        members.sort();

        members
    }

    async fn snapshot(&self) -> Vec<(RoomId, Vec<UserId>)> {
        let rooms = self.rooms.lock().await;
        let mut snapshot: Vec<(RoomId, Vec<UserId>)> = rooms
            .iter()
            .map(|(room_id, set)| {
                let mut members: Vec<UserId> = set.iter().cloned().collect();
                members.sort();
                (room_id.clone(), members)
            })
            .collect();

        snapshot.sort_by(|a, b| a.0.cmp(&b.0));

        snapshot
    }
}
