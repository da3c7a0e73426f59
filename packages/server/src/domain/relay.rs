//! Relay 集約
//!
//! 履歴バッファと接続レジストリをひとつの単位として保持する。
//! Repository はこの集約を丸ごと保存・ロックする。

use super::{
    entity::{ChatMessage, Connection},
    error::RepositoryError,
    history::HistoryBuffer,
    registry::ConnectionRegistry,
    value_object::{ConnectionId, Timestamp},
};

/// 履歴と接続中の接続の一覧（ある時点の写し）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayState {
    pub capacity: usize,
    pub connections: Vec<Connection>,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Default)]
pub struct Relay {
    history: HistoryBuffer,
    connections: ConnectionRegistry,
}

impl Relay {
    pub fn with_capacity(history_capacity: usize) -> Self {
        Self {
            history: HistoryBuffer::with_capacity(history_capacity),
            connections: ConnectionRegistry::new(),
        }
    }

    /// 接続を登録し、その時点の履歴スナップショットを返す
    ///
    /// 登録とスナップショット取得は同じ `&mut self` の中で行われるため、
    /// 間に別のメッセージが追加されることはない。
    pub fn join(
        &mut self,
        id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        if !self.connections.add(id.clone(), connected_at) {
            return Err(RepositoryError::DuplicateConnection(id.into_string()));
        }
        Ok(self.history.snapshot())
    }

    /// 接続を削除する（冪等）。履歴には触れない
    pub fn leave(&mut self, id: &ConnectionId) -> bool {
        self.connections.remove(id)
    }

    /// メッセージを履歴に追加し、その時点のブロードキャスト対象を返す
    pub fn accept(&mut self, message: ChatMessage) -> Vec<ConnectionId> {
        if let Some(evicted) = self.history.append(message) {
            tracing::debug!("Evicted message '{}' from history", evicted.id);
        }
        self.connections.broadcast_targets()
    }

    /// 容量・接続一覧・履歴をまとめて返す
    pub fn state(&self) -> RelayState {
        RelayState {
            capacity: self.history.capacity(),
            connections: self.connections.connections().to_vec(),
            messages: self.history.snapshot(),
        }
    }
}
