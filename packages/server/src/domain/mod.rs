//! Domain layer: value objects, entities, and the ports the messaging
//! subsystem consumes.
//!
//! The domain defines the interfaces it needs (message store, profile
//! directory, room registry, message pusher, auto-responder); the
//! infrastructure layer provides the implementations.

pub mod entity;
pub mod pusher;
pub mod repository;
pub mod responder;
pub mod value_object;

pub use entity::{ChatMessage, ChatMessageDraft, Profile, SenderType};
pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use repository::{MessageStore, ProfileDirectory, RoomRegistry, StoreError};
pub use responder::AutoResponder;
pub use value_object::{DomainError, MessageBody, RoomId, UserId};
