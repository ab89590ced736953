//! WebSocket wire format: inbound client frames and outbound server events.
//!
//! Frames travel as `{ "type": <kind>, "data": <payload> }` envelopes with
//! camelCase payload fields; the format is shared with the storefront web
//! client and predates this service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ChatMessage, UserId};

/// Inbound frame after decoding and tag dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    JoinRoom { room_id: String },
    SendMessage { message: String },
    Typing,
    StopTyping,
}

/// Why an inbound frame was rejected before reaching a usecase.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("invalid message format")]
    Malformed(#[source] serde_json::Error),
    #[error("unknown message type '{0}'")]
    UnknownType(String),
    #[error("invalid payload for '{kind}'")]
    Payload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinRoomData {
    room_id: String,
}

#[derive(Debug, Deserialize)]
struct SendMessageData {
    message: String,
}

impl ClientFrame {
    /// Decode one text frame.
    ///
    /// Malformed JSON, an unknown `type` tag, and a bad payload shape are
    /// distinguished so the session can answer with a precise error.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let envelope: Envelope = serde_json::from_str(text).map_err(FrameError::Malformed)?;
        match envelope.kind.as_str() {
            "join_room" => {
                let data: JoinRoomData = serde_json::from_value(envelope.data)
                    .map_err(|e| FrameError::Payload {
                        kind: "join_room",
                        source: e,
                    })?;
                Ok(Self::JoinRoom {
                    room_id: data.room_id,
                })
            }
            "send_message" => {
                let data: SendMessageData = serde_json::from_value(envelope.data)
                    .map_err(|e| FrameError::Payload {
                        kind: "send_message",
                        source: e,
                    })?;
                Ok(Self::SendMessage {
                    message: data.message,
                })
            }
            "typing" => Ok(Self::Typing),
            "stop_typing" => Ok(Self::StopTyping),
            other => Err(FrameError::UnknownType(other.to_string())),
        }
    }
}

/// Wire representation of a stored message. `isRead` stays server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: i64,
    pub user_id: Option<String>,
    pub sender_type: String,
    pub sender_name: String,
    pub message: String,
    pub room_id: String,
    pub created_at: i64,
}

/// Outbound event, broadcast to room members or pushed to one connection.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    MessageHistory {
        messages: Vec<ChatMessageDto>,
    },
    #[serde(rename_all = "camelCase")]
    UserJoined {
        user_id: String,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    UserLeft {
        user_id: String,
        message: String,
    },
    NewMessage(ChatMessageDto),
    #[serde(rename_all = "camelCase")]
    UserTyping {
        user_id: String,
        is_typing: bool,
    },
    Error {
        message: String,
    },
}

impl ServerEvent {
    pub fn message_history(messages: Vec<ChatMessage>) -> Self {
        Self::MessageHistory {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn user_joined(user_id: &UserId) -> Self {
        Self::UserJoined {
            user_id: user_id.as_str().to_string(),
            message: format!("{} joined the room", user_id),
        }
    }

    pub fn user_left(user_id: &UserId) -> Self {
        Self::UserLeft {
            user_id: user_id.as_str().to_string(),
            message: format!("{} left the room", user_id),
        }
    }

    pub fn new_message(message: &ChatMessage) -> Self {
        Self::NewMessage(message.clone().into())
    }

    pub fn user_typing(user_id: &UserId, is_typing: bool) -> Self {
        Self::UserTyping {
            user_id: user_id.as_str().to_string(),
            is_typing,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Serialize for the wire.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("server events serialize")
    }
}
