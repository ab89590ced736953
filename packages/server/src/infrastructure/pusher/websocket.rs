//! WebSocket-backed `MessagePusher` implementation.
//!
//! Owns the map of live connections keyed by user id. The WebSocket itself
//! is created in the transport layer (`ui::handler::websocket`); this
//! implementation receives each connection's `UnboundedSender` and uses it
//! for delivery, so event delivery never blocks on a peer.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessagePushError, MessagePusher, PusherChannel, UserId};

/// Connection registry plus event delivery over unbounded channels.
pub struct WebSocketMessagePusher {
    /// Live connections keyed by user id.
    clients: Arc<Mutex<HashMap<UserId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, user_id: UserId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        // Last connection wins: an existing entry for the same user is
        // replaced without closing the old connection.
        if clients.insert(user_id.clone(), sender).is_some() {
            tracing::warn!(
                "user '{}' was already connected; superseding the previous channel",
                user_id
            );
        } else {
            tracing::debug!("user '{}' registered", user_id);
        }
    }

    async fn unregister_client(&self, user_id: &UserId) {
        let mut clients = self.clients.lock().await;
        clients.remove(user_id);
        tracing::debug!("user '{}' unregistered", user_id);
    }

    async fn is_connected(&self, user_id: &UserId) -> bool {
        let clients = self.clients.lock().await;
        clients.contains_key(user_id)
    }

    async fn push_to(&self, user_id: &UserId, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(user_id) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(user_id.to_string(), e.to_string()))?;
            tracing::debug!("pushed event to user '{}'", user_id);
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(user_id.to_string()))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<UserId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(&target) {
                // Per-recipient failures must not abort delivery to the rest.
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!("failed to push event to user '{}': {}", target, e);
                } else {
                    tracing::debug!("broadcast event to user '{}'", target);
                }
            } else {
                tracing::warn!("user '{}' not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn user(name: &str) -> UserId {
        UserId::new(name.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // given:
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let alice = user("alice");
        pusher.register_client(alice.clone(), tx).await;

        // when:
        let result = pusher.push_to(&alice, "Hello").await;

        // then:
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // given:
        let pusher = WebSocketMessagePusher::new();
        let nobody = user("nobody");

        // when:
        let result = pusher.push_to(&nobody, "Hello").await;

        // then:
        assert!(matches!(
            result,
            Err(MessagePushError::ClientNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_targets() {
        // given:
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let alice = user("alice");
        let bob = user("bob");
        pusher.register_client(alice.clone(), tx1).await;
        pusher.register_client(bob.clone(), tx2).await;

        // when:
        let result = pusher.broadcast(vec![alice, bob], "fan-out").await;

        // then:
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("fan-out".to_string()));
        assert_eq!(rx2.recv().await, Some("fan-out".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_skips_missing_and_closed_targets() {
        // given: bob's receiver is dropped, charlie was never registered
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        let alice = user("alice");
        let bob = user("bob");
        let charlie = user("charlie");
        pusher.register_client(alice.clone(), tx1).await;
        pusher.register_client(bob.clone(), tx2).await;
        drop(rx2);

        // when:
        let result = pusher.broadcast(vec![alice, bob, charlie], "still delivered").await;

        // then: the healthy recipient still gets the event
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("still delivered".to_string()));
    }

    #[tokio::test]
    async fn test_register_supersedes_previous_channel() {
        // given: alice connects twice
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let alice = user("alice");
        pusher.register_client(alice.clone(), tx1).await;
        pusher.register_client(alice.clone(), tx2).await;

        // when:
        pusher.push_to(&alice, "to the latest").await.unwrap();

        // then: only the most recent channel receives the event
        assert_eq!(rx2.recv().await, Some("to the latest".to_string()));
        assert!(rx1.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        // given:
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let alice = user("alice");
        pusher.register_client(alice.clone(), tx).await;

        // when:
        pusher.unregister_client(&alice).await;
        pusher.unregister_client(&alice).await;

        // then:
        assert!(!pusher.is_connected(&alice).await);
    }
}
