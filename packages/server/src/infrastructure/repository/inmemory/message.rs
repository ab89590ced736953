//! In-memory `MessageStore` implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use bodega_shared::time::Clock;

use crate::domain::{ChatMessage, ChatMessageDraft, MessageStore, RoomId, StoreError};

/// Append-only message log held in process memory.
///
/// Assigns monotonically increasing ids and clock-driven `created_at`
/// timestamps. An optional capacity bounds the log; a full log rejects
/// further appends, which mirrors how a real backing store can refuse a
/// write.
pub struct InMemoryMessageStore {
    inner: Mutex<Inner>,
    clock: Arc<dyn Clock>,
    capacity: Option<usize>,
}

struct Inner {
    messages: Vec<ChatMessage>,
    next_id: i64,
}

impl InMemoryMessageStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                messages: Vec::new(),
                next_id: 1,
            }),
            clock,
            capacity: None,
        }
    }

    pub fn with_capacity(clock: Arc<dyn Clock>, capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::new(clock)
        }
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, draft: ChatMessageDraft) -> Result<ChatMessage, StoreError> {
        let mut inner = self.inner.lock().await;

        if let Some(capacity) = self.capacity
            && inner.messages.len() >= capacity
        {
            return Err(StoreError::Rejected("message log is full".to_string()));
        }

        let message = ChatMessage {
            id: inner.next_id,
            user_id: draft.user_id,
            sender_type: draft.sender_type,
            sender_name: draft.sender_name,
            body: draft.body,
            room_id: draft.room_id,
            is_read: draft.is_read,
            created_at: self.clock.now_millis(),
        };
        inner.next_id += 1;
        inner.messages.push(message.clone());

        tracing::debug!("stored message {} in room '{}'", message.id, message.room_id);
        Ok(message)
    }

    async fn recent(&self, room_id: &RoomId, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let inner = self.inner.lock().await;

        let in_room: Vec<ChatMessage> = inner
            .messages
            .iter()
            .filter(|m| &m.room_id == room_id)
            .cloned()
            .collect();

        // Most recent `limit`, kept in append (oldest-first) order.
        let skip = in_room.len().saturating_sub(limit);
        Ok(in_room.into_iter().skip(skip).collect())
    }
}
