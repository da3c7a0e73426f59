//! エンティティ

use super::value_object::{ConnectionId, DisplayName, MessageId, MessageText, Timestamp};

/// 送信者のプロフィール
///
/// 本人確認は行わない。クライアントの申告をそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderProfile {
    pub display_name: DisplayName,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl SenderProfile {
    pub fn new(display_name: DisplayName, email: Option<String>, photo_url: Option<String>) -> Self {
        Self {
            display_name,
            email,
            photo_url,
        }
    }
}

/// 受理済みのチャットメッセージ
///
/// MessageNormalizer だけが生成し、生成後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: MessageText,
    pub sender: SenderProfile,
    pub timestamp: Timestamp,
    /// 送信元の接続。クライアントが「自分のメッセージか」を判定するために使う
    pub origin: ConnectionId,
}

impl ChatMessage {
    pub fn new(
        id: MessageId,
        text: MessageText,
        sender: SenderProfile,
        timestamp: Timestamp,
        origin: ConnectionId,
    ) -> Self {
        Self {
            id,
            text,
            sender,
            timestamp,
            origin,
        }
    }
}

/// 接続中のクライアント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub connected_at: Timestamp,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self { id, connected_at }
    }
}

/// クライアントへ通知するイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// 接続直後に、その接続だけへ送る履歴のスナップショット
    HistoryLoaded {
        connection_id: ConnectionId,
        messages: Vec<ChatMessage>,
    },
    /// 受理されたメッセージ（全接続へのブロードキャスト）
    MessageAccepted(ChatMessage),
}
