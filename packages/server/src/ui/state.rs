//! Server state shared across handlers.

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomRegistry};
use crate::usecase::{
    AutoReplyUseCase, DisconnectUseCase, JoinRoomUseCase, NotifyTypingUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub notify_typing_usecase: Arc<NotifyTypingUseCase>,
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    pub auto_reply_usecase: Arc<AutoReplyUseCase>,
    /// Room table, exposed for the observability endpoints.
    pub rooms: Arc<dyn RoomRegistry>,
    /// Connection registry; handlers register sessions and answer
    /// presence lookups through it.
    pub pusher: Arc<dyn MessagePusher>,
}
