//! ドメイン層
//!
//! 履歴バッファ・接続レジストリ・メッセージの正規化と、
//! 外部とのやりとりに使う trait（Repository, MessagePusher）を定義する。

pub mod entity;
pub mod error;
pub mod factory;
pub mod history;
pub mod message_pusher;
pub mod normalizer;
pub mod registry;
pub mod relay;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Connection, RelayEvent, SenderProfile};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use factory::{ConnectionIdFactory, MessageIdFactory};
pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryBuffer};
pub use message_pusher::{MessagePusher, OUTBOUND_QUEUE_CAPACITY, PusherChannel};
pub use normalizer::{MessageNormalizer, RawProfile, Submission};
pub use registry::ConnectionRegistry;
pub use relay::{Relay, RelayState};
pub use repository::RelayRepository;
pub use value_object::{
    ConnectionId, DEFAULT_DISPLAY_NAME, DisplayName, MessageId, MessageText, Timestamp,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
