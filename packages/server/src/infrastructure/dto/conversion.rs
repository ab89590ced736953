//! Conversion logic between DTOs and domain entities.

use crate::domain::entity::ChatMessage;
use crate::domain::value_object::UserId;
use crate::infrastructure::dto::websocket::ChatMessageDto;

impl From<ChatMessage> for ChatMessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id.map(UserId::into_string),
            sender_type: model.sender_type.as_str().to_string(),
            sender_name: model.sender_name,
            message: model.body.into_string(),
            room_id: model.room_id.into_string(),
            created_at: model.created_at,
        }
    }
}
