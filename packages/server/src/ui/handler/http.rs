//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{HealthDto, PlayerDetailDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        players: state.get_players_usecase.count().await,
    })
}

/// Debug endpoint listing the joined players and their last reported state
pub async fn get_players(State(state): State<Arc<AppState>>) -> Json<Vec<PlayerDetailDto>> {
    let roster = state.get_players_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(roster.into_iter().map(Into::into).collect())
}

/// Chrome devtools probes this path on every page load; answer instead of 404-ing.
pub async fn devtools_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
