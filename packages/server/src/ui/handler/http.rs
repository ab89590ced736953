//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::domain::UserId;
use crate::infrastructure::dto::http::{PresenceDto, RoomSummaryDto};
use crate::ui::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List active rooms and their members.
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let snapshot = state.rooms.snapshot().await;

    let summaries: Vec<RoomSummaryDto> = snapshot
        .into_iter()
        .map(|(room_id, members)| RoomSummaryDto {
            id: room_id.into_string(),
            members: members.into_iter().map(UserId::into_string).collect(),
        })
        .collect();

    Json(summaries)
}

/// Report whether a user currently holds a live connection.
pub async fn get_presence(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<PresenceDto>, StatusCode> {
    let user_id = UserId::try_from(user_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    let online = state.pusher.is_connected(&user_id).await;

    Ok(Json(PresenceDto {
        user_id: user_id.into_string(),
        online,
    }))
}
