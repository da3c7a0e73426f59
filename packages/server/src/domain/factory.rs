//! ID の採番

use uuid::Uuid;

use super::value_object::{ConnectionId, MessageId};

/// MessageId の生成
pub struct MessageIdFactory;

impl MessageIdFactory {
    pub fn generate() -> MessageId {
        MessageId::new(Uuid::new_v4())
    }
}

/// ConnectionId の生成
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        // UUID の文字列表現は空にならない
        ConnectionId(Uuid::new_v4().to_string())
    }
}
