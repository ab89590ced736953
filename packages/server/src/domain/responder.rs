//! Auto-responder collaborator boundary.

use std::time::Duration;

use super::value_object::{MessageBody, RoomId};

/// External collaborator that supplies scripted replies for designated
/// rooms.
///
/// The subsystem's contract with it: after a stored user message in an
/// eligible room, schedule zero or one stored-and-broadcast reply. Delay
/// and reply text are owned by the implementation.
pub trait AutoResponder: Send + Sync {
    /// Whether messages in this room trigger a scripted reply.
    fn eligible(&self, room_id: &RoomId) -> bool;

    /// Delay before the reply is produced.
    fn reply_delay(&self) -> Duration;

    /// Body of the next reply.
    fn reply_body(&self) -> MessageBody;

    /// Display name attached to synthetic messages.
    fn display_name(&self) -> &str;
}
