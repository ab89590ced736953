//! Scripted support-desk responder.

use std::time::Duration;

use rand::Rng;

use crate::domain::{AutoResponder, MessageBody, RoomId};

/// Candidate replies, picked uniformly at random.
const REPLIES: [&str; 5] = [
    "Thanks for reaching out! An agent will be with you shortly.",
    "We have received your message and are looking into it.",
    "Could you share your order number so we can check the details?",
    "Our support team usually replies within a few minutes.",
    "Is there anything else we can help you with in the meantime?",
];

const MIN_DELAY_MS: u64 = 1_000;
const MAX_DELAY_MS: u64 = 3_000;

/// Auto-responder covering the support rooms: rooms whose id carries the
/// configured prefix get a scripted reply after a randomized short delay.
pub struct ScriptedAutoResponder {
    room_prefix: String,
    display_name: String,
}

impl ScriptedAutoResponder {
    pub fn new() -> Self {
        Self::with_room_prefix("support")
    }

    pub fn with_room_prefix(prefix: impl Into<String>) -> Self {
        Self {
            room_prefix: prefix.into(),
            display_name: "Support".to_string(),
        }
    }
}

impl Default for ScriptedAutoResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoResponder for ScriptedAutoResponder {
    fn eligible(&self, room_id: &RoomId) -> bool {
        room_id.as_str().starts_with(&self.room_prefix)
    }

    fn reply_delay(&self) -> Duration {
        let millis = rand::rng().random_range(MIN_DELAY_MS..=MAX_DELAY_MS);
        Duration::from_millis(millis)
    }

    fn reply_body(&self) -> MessageBody {
        let idx = rand::rng().random_range(0..REPLIES.len());
        MessageBody::new(REPLIES[idx].to_string()).expect("candidate replies are non-empty")
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(name: &str) -> RoomId {
        RoomId::new(name.to_string()).unwrap()
    }

    #[test]
    fn test_eligibility_follows_room_prefix() {
        // given:
        let responder = ScriptedAutoResponder::new();

        // when:

        // then:
        assert!(responder.eligible(&room("support")));
        assert!(responder.eligible(&room("support-orders")));
        assert!(!responder.eligible(&room("general")));
    }

    #[test]
    fn test_reply_delay_stays_in_window() {
        // given:
        let responder = ScriptedAutoResponder::new();

        // when / then:
        for _ in 0..20 {
            let delay = responder.reply_delay();
            assert!(delay >= Duration::from_millis(MIN_DELAY_MS));
            assert!(delay <= Duration::from_millis(MAX_DELAY_MS));
        }
    }

    #[test]
    fn test_reply_body_comes_from_candidate_set() {
        // given:
        let responder = ScriptedAutoResponder::new();

        // when / then:
        for _ in 0..20 {
            let body = responder.reply_body();
            assert!(REPLIES.contains(&body.as_str()));
        }
    }
}
