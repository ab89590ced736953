//! HTTP API response DTOs.

use serde::Serialize;

/// Summary of one active room.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub members: Vec<String>,
}

/// Connection-registry lookup result for one user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceDto {
    pub user_id: String,
    pub online: bool,
}
