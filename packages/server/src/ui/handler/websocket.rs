//! WebSocket connection handlers.
//!
//! One session per connection: the handshake carries the user identity and
//! an optional starting room, inbound frames are decoded and dispatched to
//! the usecases, and transport close triggers the one-and-only teardown.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use crate::domain::{RoomId, UserId};
use crate::infrastructure::dto::websocket::{ClientFrame, ServerEvent};
use crate::ui::state::AppState;

/// Query parameters supplied in the connection handshake.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub user_id: String,
    pub room_id: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let user_id = match UserId::try_from(query.user_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("rejected connection: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let room_id = match query.room_id {
        Some(raw) => match RoomId::try_from(raw) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("rejected connection from '{}': {}", user_id, e);
                return Err(StatusCode::BAD_REQUEST);
            }
        },
        None => RoomId::default(),
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id, room_id)))
}

/// Spawns a task that drains the outbound channel into the WebSocket sink.
///
/// Ends when the channel closes or the peer stops accepting writes; either
/// way the session's `select!` below tears the connection down.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    user_id: UserId,
    initial_room: RoomId,
) {
    // Ephemeral id for log correlation; two connections for the same user
    // stay distinguishable.
    let connection_id = Uuid::new_v4();

    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // Register before joining so the history push lands in this
    // connection's queue.
    state.pusher.register_client(user_id.clone(), tx).await;

    let mut send_task = pusher_loop(rx, sender);

    if let Err(e) = state
        .join_room_usecase
        .execute(&user_id, None, &initial_room)
        .await
    {
        tracing::warn!(%connection_id, "join of '{}' incomplete: {}", user_id, e);
        reply_error(&state, &user_id, &e.to_string()).await;
    }
    tracing::info!(
        %connection_id,
        "user '{}' connected to room '{}'",
        user_id,
        initial_room
    );

    let current_room = Arc::new(Mutex::new(initial_room));

    let recv_state = state.clone();
    let recv_user = user_id.clone();
    let recv_room = current_room.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch_frame(&recv_state, &recv_user, &recv_room, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("user '{}' requested close", recv_user);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Teardown runs exactly once, after both pumps have stopped.
    let room = current_room.lock().await.clone();
    state.disconnect_usecase.execute(&user_id, &room).await;
    tracing::info!(%connection_id, "user '{}' disconnected", user_id);
}

/// Decode and dispatch one inbound text frame.
///
/// Failures of any kind are answered to the sender only; the session stays
/// open and no other room member sees anything.
async fn dispatch_frame(
    state: &Arc<AppState>,
    user_id: &UserId,
    current_room: &Arc<Mutex<RoomId>>,
    text: &str,
) {
    let frame = match ClientFrame::parse(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("rejected frame from '{}': {}", user_id, e);
            reply_error(state, user_id, &e.to_string()).await;
            return;
        }
    };

    match frame {
        ClientFrame::JoinRoom { room_id } => {
            let next = match RoomId::try_from(room_id) {
                Ok(id) => id,
                Err(e) => {
                    reply_error(state, user_id, &e.to_string()).await;
                    return;
                }
            };

            let previous = current_room.lock().await.clone();
            let result = state
                .join_room_usecase
                .execute(user_id, Some(&previous), &next)
                .await;
            // The membership move happened even when the history fetch
            // failed, so the tracked room always advances.
            *current_room.lock().await = next;
            if let Err(e) = result {
                reply_error(state, user_id, &e.to_string()).await;
            }
        }
        ClientFrame::SendMessage { message } => {
            let room = current_room.lock().await.clone();
            match state
                .send_message_usecase
                .execute(user_id, &room, message)
                .await
            {
                Ok(stored) => {
                    tracing::debug!("user '{}' sent message {} to '{}'", user_id, stored.id, room);
                    state.auto_reply_usecase.schedule(&room);
                }
                Err(e) => {
                    tracing::warn!("send from '{}' rejected: {}", user_id, e);
                    reply_error(state, user_id, &e.to_string()).await;
                }
            }
        }
        ClientFrame::Typing => {
            let room = current_room.lock().await.clone();
            state.notify_typing_usecase.execute(user_id, &room, true).await;
        }
        ClientFrame::StopTyping => {
            let room = current_room.lock().await.clone();
            state
                .notify_typing_usecase
                .execute(user_id, &room, false)
                .await;
        }
    }
}

/// Send an `error` event to the originating connection only.
async fn reply_error(state: &Arc<AppState>, user_id: &UserId, message: &str) {
    let event = ServerEvent::error(message);
    if let Err(e) = state.pusher.push_to(user_id, &event.to_json()).await {
        tracing::debug!("could not deliver error to '{}': {}", user_id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessagePusher, Profile, RoomRegistry};
    use crate::infrastructure::pusher::WebSocketMessagePusher;
    use crate::infrastructure::repository::inmemory::{
        InMemoryMessageStore, InMemoryProfileDirectory, InMemoryRoomRegistry,
    };
    use crate::infrastructure::responder::ScriptedAutoResponder;
    use crate::usecase::{
        AutoReplyUseCase, DisconnectUseCase, JoinRoomUseCase, NotifyTypingUseCase,
        SendMessageUseCase,
    };
    use bodega_shared::time::FixedClock;

    fn user(name: &str) -> UserId {
        UserId::new(name.to_string()).unwrap()
    }

    fn room(name: &str) -> RoomId {
        RoomId::new(name.to_string()).unwrap()
    }

    struct Fixture {
        state: Arc<AppState>,
        profiles: Arc<InMemoryProfileDirectory>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryMessageStore::new(Arc::new(FixedClock::new(
            1700000000000,
        ))));
        let profiles = Arc::new(InMemoryProfileDirectory::new());
        let rooms = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let responder = Arc::new(ScriptedAutoResponder::new());

        let state = Arc::new(AppState {
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                store.clone(),
                rooms.clone(),
                pusher.clone(),
                50,
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                store.clone(),
                profiles.clone(),
                rooms.clone(),
                pusher.clone(),
            )),
            notify_typing_usecase: Arc::new(NotifyTypingUseCase::new(
                rooms.clone(),
                pusher.clone(),
            )),
            disconnect_usecase: Arc::new(DisconnectUseCase::new(rooms.clone(), pusher.clone())),
            auto_reply_usecase: Arc::new(AutoReplyUseCase::new(
                store.clone(),
                rooms.clone(),
                pusher.clone(),
                responder,
            )),
            rooms,
            pusher,
        });

        Fixture { state, profiles }
    }

    impl Fixture {
        /// Register a connection and join it to a room, draining the join
        /// events, so tests start from a settled session.
        async fn session(
            &self,
            name: &str,
            room_name: &str,
        ) -> (
            UserId,
            Arc<Mutex<RoomId>>,
            mpsc::UnboundedReceiver<String>,
        ) {
            let user = user(name);
            let (tx, mut rx) = mpsc::unbounded_channel();
            self.state.pusher.register_client(user.clone(), tx).await;
            self.profiles
                .insert(user.clone(), Profile::new(name, "Tester"))
                .await;
            self.state
                .join_room_usecase
                .execute(&user, None, &room(room_name))
                .await
                .unwrap();
            while rx.try_recv().is_ok() {}
            (user, Arc::new(Mutex::new(room(room_name))), rx)
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<serde_json::Value> {
        std::iter::from_fn(|| rx.try_recv().ok())
            .map(|raw| serde_json::from_str(&raw).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_unknown_frame_type_errors_the_sender_only() {
        // given: alice and bob share a room
        let fx = fixture();
        let (alice, alice_room, mut alice_rx) = fx.session("alice", "general").await;
        let (_bob, _bob_room, mut bob_rx) = fx.session("bob", "general").await;
        drain(&mut alice_rx);

        // when:
        dispatch_frame(
            &fx.state,
            &alice,
            &alice_room,
            r#"{"type":"bogus","data":{}}"#,
        )
        .await;

        // then: exactly one error to alice, nothing to bob
        let alice_events = drain(&mut alice_rx);
        assert_eq!(alice_events.len(), 1);
        assert_eq!(alice_events[0]["type"], "error");
        assert_eq!(
            alice_events[0]["data"]["message"],
            "unknown message type 'bogus'"
        );
        assert!(drain(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_malformed_frame_errors_the_sender_and_session_survives() {
        // given:
        let fx = fixture();
        let (alice, alice_room, mut alice_rx) = fx.session("alice", "general").await;

        // when: garbage, then a valid typing frame
        dispatch_frame(&fx.state, &alice, &alice_room, "not json").await;
        dispatch_frame(
            &fx.state,
            &alice,
            &alice_room,
            r#"{"type":"typing","data":{}}"#,
        )
        .await;

        // then: the error arrived and the session kept dispatching
        let alice_events = drain(&mut alice_rx);
        assert_eq!(alice_events.len(), 1);
        assert_eq!(alice_events[0]["type"], "error");
        assert_eq!(alice_events[0]["data"]["message"], "invalid message format");
    }

    #[tokio::test]
    async fn test_send_message_frame_persists_and_echoes() {
        // given:
        let fx = fixture();
        let (alice, alice_room, mut alice_rx) = fx.session("alice", "general").await;

        // when:
        dispatch_frame(
            &fx.state,
            &alice,
            &alice_room,
            r#"{"type":"send_message","data":{"message":"hello"}}"#,
        )
        .await;

        // then: the sender's own connection received the echo
        let alice_events = drain(&mut alice_rx);
        assert_eq!(alice_events.len(), 1);
        assert_eq!(alice_events[0]["type"], "new_message");
        assert_eq!(alice_events[0]["data"]["message"], "hello");
    }

    #[tokio::test]
    async fn test_empty_send_message_frame_is_answered_with_error() {
        // given:
        let fx = fixture();
        let (alice, alice_room, mut alice_rx) = fx.session("alice", "general").await;

        // when:
        dispatch_frame(
            &fx.state,
            &alice,
            &alice_room,
            r#"{"type":"send_message","data":{"message":"   "}}"#,
        )
        .await;

        // then:
        let alice_events = drain(&mut alice_rx);
        assert_eq!(alice_events.len(), 1);
        assert_eq!(alice_events[0]["type"], "error");
        assert_eq!(
            alice_events[0]["data"]["message"],
            "message must not be empty"
        );
    }

    #[tokio::test]
    async fn test_join_room_frame_moves_the_session() {
        // given:
        let fx = fixture();
        let (alice, alice_room, mut alice_rx) = fx.session("alice", "general").await;

        // when:
        dispatch_frame(
            &fx.state,
            &alice,
            &alice_room,
            r#"{"type":"join_room","data":{"roomId":"support"}}"#,
        )
        .await;

        // then: the tracked room advanced and a fresh history was pushed
        assert_eq!(*alice_room.lock().await, room("support"));
        assert_eq!(
            fx.state.rooms.members(&room("support")).await,
            vec![user("alice")]
        );
        assert!(fx.state.rooms.members(&room("general")).await.is_empty());
        let alice_events = drain(&mut alice_rx);
        assert_eq!(alice_events.len(), 1);
        assert_eq!(alice_events[0]["type"], "message_history");
    }

    #[tokio::test]
    async fn test_typing_frames_fan_out_with_the_right_flag() {
        // given:
        let fx = fixture();
        let (alice, alice_room, mut alice_rx) = fx.session("alice", "general").await;
        let (_bob, _bob_room, mut bob_rx) = fx.session("bob", "general").await;
        drain(&mut alice_rx);

        // when:
        dispatch_frame(
            &fx.state,
            &alice,
            &alice_room,
            r#"{"type":"typing","data":{}}"#,
        )
        .await;
        dispatch_frame(
            &fx.state,
            &alice,
            &alice_room,
            r#"{"type":"stop_typing","data":{}}"#,
        )
        .await;

        // then: bob saw both flags, alice saw neither
        let bob_events = drain(&mut bob_rx);
        assert_eq!(bob_events.len(), 2);
        assert_eq!(bob_events[0]["data"]["isTyping"], true);
        assert_eq!(bob_events[1]["data"]["isTyping"], false);
        assert!(drain(&mut alice_rx).is_empty());
    }
}
