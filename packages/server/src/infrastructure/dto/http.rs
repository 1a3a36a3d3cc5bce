//! HTTP API response types.

use serde::{Deserialize, Serialize};

use super::websocket::PlayerInfo;

/// `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub players: usize,
}

/// One entry of `GET /api/players`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDetailDto {
    /// RFC 3339
    pub joined_at: String,
    #[serde(flatten)]
    pub player: PlayerInfo,
}
