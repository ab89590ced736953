//! Application usecases driving the messaging domain.

mod auto_reply;
mod disconnect;
mod error;
mod join_room;
mod notify_typing;
mod send_message;

pub use auto_reply::AutoReplyUseCase;
pub use disconnect::DisconnectUseCase;
pub use error::{JoinRoomError, SendMessageError};
pub use join_room::JoinRoomUseCase;
pub use notify_typing::NotifyTypingUseCase;
pub use send_message::SendMessageUseCase;
