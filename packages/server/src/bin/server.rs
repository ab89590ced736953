//! Room-based messaging server for the bodega storefront.
//!
//! Accepts WebSocket connections carrying a user identity and an optional
//! starting room, persists messages, and fans out chat, presence, and
//! typing events to room members.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin bodega-server
//! cargo run --bin bodega-server -- --host 0.0.0.0 --port 3000 \
//!     --profile "alice=Alice Johnson" --profile "bob=Bob Stone"
//! ```

use std::sync::Arc;

use bodega_server::{
    domain::{Profile, UserId},
    infrastructure::{
        pusher::WebSocketMessagePusher,
        repository::inmemory::{
            InMemoryMessageStore, InMemoryProfileDirectory, InMemoryRoomRegistry,
        },
        responder::ScriptedAutoResponder,
    },
    ui::Server,
    usecase::{
        AutoReplyUseCase, DisconnectUseCase, JoinRoomUseCase, NotifyTypingUseCase,
        SendMessageUseCase,
    },
};
use bodega_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bodega-server")]
#[command(about = "Room-based chat server for the storefront", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Number of messages pushed as history on room entry
    #[arg(long, default_value_t = 50)]
    history_limit: usize,

    /// Seed a user profile, formatted as "user_id=First Last" (repeatable)
    #[arg(long = "profile", value_parser = parse_profile)]
    profiles: Vec<(String, Profile)>,
}

fn parse_profile(raw: &str) -> Result<(String, Profile), String> {
    let (user_id, name) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected \"user_id=First Last\", got \"{raw}\""))?;
    if user_id.trim().is_empty() {
        return Err("user id must not be empty".to_string());
    }

    let mut parts = name.split_whitespace();
    let first_name = parts
        .next()
        .ok_or_else(|| "profile name must not be empty".to_string())?;
    let last_name = parts.collect::<Vec<_>>().join(" ");

    Ok((user_id.to_string(), Profile::new(first_name, last_name)))
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Stores, registries, responder
    // 2. UseCases
    // 3. Server

    let clock = Arc::new(SystemClock);
    let store = Arc::new(InMemoryMessageStore::new(clock));
    let profiles = Arc::new(InMemoryProfileDirectory::new());
    for (user_id, profile) in args.profiles {
        let user_id = UserId::new(user_id).expect("profile user ids are validated at parse time");
        tracing::info!("seeded profile for '{}'", user_id);
        profiles.insert(user_id, profile).await;
    }
    let rooms = Arc::new(InMemoryRoomRegistry::new());
    let pusher = Arc::new(WebSocketMessagePusher::new());
    let responder = Arc::new(ScriptedAutoResponder::new());

    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        store.clone(),
        rooms.clone(),
        pusher.clone(),
        args.history_limit,
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        store.clone(),
        profiles.clone(),
        rooms.clone(),
        pusher.clone(),
    ));
    let notify_typing_usecase = Arc::new(NotifyTypingUseCase::new(rooms.clone(), pusher.clone()));
    let disconnect_usecase = Arc::new(DisconnectUseCase::new(rooms.clone(), pusher.clone()));
    let auto_reply_usecase = Arc::new(AutoReplyUseCase::new(
        store.clone(),
        rooms.clone(),
        pusher.clone(),
        responder,
    ));

    let server = Server::new(
        join_room_usecase,
        send_message_usecase,
        notify_typing_usecase,
        disconnect_usecase,
        auto_reply_usecase,
        rooms,
        pusher,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
