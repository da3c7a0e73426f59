//! Conversion logic between DTOs and domain entities.

use chatrelay_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    entity,
    normalizer::{RawProfile, Submission},
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl From<dto::UserInfoDto> for RawProfile {
    fn from(dto: dto::UserInfoDto) -> Self {
        Self {
            display_name: dto.display_name,
            email: dto.email,
            photo_url: dto.photo_url,
        }
    }
}

impl From<dto::SubmitMessage> for Submission {
    fn from(dto: dto::SubmitMessage) -> Self {
        Self {
            text: dto.text,
            profile: dto.user.map(RawProfile::from).unwrap_or_default(),
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&entity::SenderProfile> for dto::UserInfoDto {
    fn from(model: &entity::SenderProfile) -> Self {
        Self {
            display_name: Some(model.display_name.as_str().to_string()),
            email: model.email.clone(),
            photo_url: model.photo_url.clone(),
        }
    }
}

impl From<&entity::ChatMessage> for dto::ChatMessageDto {
    fn from(model: &entity::ChatMessage) -> Self {
        Self {
            id: model.id.to_string(),
            text: model.text.as_str().to_string(),
            user: (&model.sender).into(),
            timestamp: model.timestamp.value(),
            socket_id: model.origin.as_str().to_string(),
        }
    }
}

impl From<&entity::RelayEvent> for dto::OutboundMessage {
    fn from(event: &entity::RelayEvent) -> Self {
        match event {
            entity::RelayEvent::HistoryLoaded {
                connection_id,
                messages,
            } => dto::OutboundMessage::Load(dto::ChatLoadMessage {
                r#type: dto::MessageType::ChatLoad,
                connection_id: connection_id.as_str().to_string(),
                messages: messages.iter().map(dto::ChatMessageDto::from).collect(),
            }),
            entity::RelayEvent::MessageAccepted(message) => {
                dto::OutboundMessage::Broadcast(dto::ChatBroadcastMessage {
                    r#type: dto::MessageType::ChatMessage,
                    message: message.into(),
                })
            }
        }
    }
}

impl From<&entity::Connection> for http::ConnectionDetailDto {
    fn from(model: &entity::Connection) -> Self {
        let millis = model.connected_at.value();
        Self {
            connection_id: model.id.as_str().to_string(),
            connected_at: timestamp_to_rfc3339(millis).unwrap_or_else(|| millis.to_string()),
        }
    }
}
