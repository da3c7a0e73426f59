//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::ChatMessageDto;

/// Connection detail for the debug endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetailDto {
    pub connection_id: String,
    /// RFC 3339 (UTC)
    pub connected_at: String,
}

/// Current relay state: history window and active connections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayStateDto {
    pub capacity: usize,
    pub connections: Vec<ConnectionDetailDto>,
    pub messages: Vec<ChatMessageDto>,
}
