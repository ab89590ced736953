//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::domain::{MessagePusher, RoomRegistry};
use crate::usecase::{
    AutoReplyUseCase, DisconnectUseCase, JoinRoomUseCase, NotifyTypingUseCase, SendMessageUseCase,
};

use super::handler::http::{get_presence, get_rooms, health_check};
use super::handler::websocket::websocket_handler;
use super::signal::shutdown_signal;
use super::state::AppState;

/// Room-based messaging server.
///
/// Encapsulates the wired usecases and runs the axum application: the
/// WebSocket endpoint plus the observability API.
pub struct Server {
    join_room_usecase: Arc<JoinRoomUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
    notify_typing_usecase: Arc<NotifyTypingUseCase>,
    disconnect_usecase: Arc<DisconnectUseCase>,
    auto_reply_usecase: Arc<AutoReplyUseCase>,
    rooms: Arc<dyn RoomRegistry>,
    pusher: Arc<dyn MessagePusher>,
}

impl Server {
    pub fn new(
        join_room_usecase: Arc<JoinRoomUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        notify_typing_usecase: Arc<NotifyTypingUseCase>,
        disconnect_usecase: Arc<DisconnectUseCase>,
        auto_reply_usecase: Arc<AutoReplyUseCase>,
        rooms: Arc<dyn RoomRegistry>,
        pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            join_room_usecase,
            send_message_usecase,
            notify_typing_usecase,
            disconnect_usecase,
            auto_reply_usecase,
            rooms,
            pusher,
        }
    }

    /// Run the messaging server.
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified
    /// address or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            join_room_usecase: self.join_room_usecase,
            send_message_usecase: self.send_message_usecase,
            notify_typing_usecase: self.notify_typing_usecase,
            disconnect_usecase: self.disconnect_usecase,
            auto_reply_usecase: self.auto_reply_usecase,
            rooms: self.rooms,
            pusher: self.pusher,
        });

        let app = Router::new()
            .route("/ws", get(websocket_handler))
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/presence/{user_id}", get(get_presence))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("messaging server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
