//! WebSocket message DTOs.
//!
//! Every frame is a JSON text frame carrying a `type` tag. The event names
//! (`chat:message`, `chat:load`) and field names are shared with the web client.

use serde::{Deserialize, Serialize};

/// Message type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    /// Client -> server submission, and server -> client broadcast
    #[serde(rename = "chat:message")]
    ChatMessage,
    /// Server -> client history snapshot, sent once on connect
    #[serde(rename = "chat:load")]
    ChatLoad,
}

/// Sender profile as seen on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfoDto {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

/// Inbound submission (client -> server)
///
/// A missing `text` deserializes to an empty string and is dropped by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitMessage {
    pub r#type: MessageType,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user: Option<UserInfoDto>,
}

/// Accepted message (server -> client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: String,
    pub text: String,
    pub user: UserInfoDto,
    /// Unix milliseconds, server clock
    pub timestamp: i64,
    /// Connection the message originated from
    pub socket_id: String,
}

/// History snapshot sent to a newly connected client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatLoadMessage {
    pub r#type: MessageType,
    /// The receiving client's own connection id
    pub connection_id: String,
    pub messages: Vec<ChatMessageDto>,
}

/// Broadcast of one accepted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatBroadcastMessage {
    pub r#type: MessageType,
    pub message: ChatMessageDto,
}

/// Any server -> client frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Load(ChatLoadMessage),
    Broadcast(ChatBroadcastMessage),
}
