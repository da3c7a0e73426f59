//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::{
        http::{ConnectionDetailDto, RelayStateDto},
        websocket::ChatMessageDto,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint to get the current history window and connections
pub async fn debug_relay_state(State(state): State<Arc<AppState>>) -> Json<RelayStateDto> {
    let relay_state = state.get_relay_state_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(RelayStateDto {
        capacity: relay_state.capacity,
        connections: relay_state
            .connections
            .iter()
            .map(ConnectionDetailDto::from)
            .collect(),
        messages: relay_state
            .messages
            .iter()
            .map(ChatMessageDto::from)
            .collect(),
    })
}
