//! 接続レジストリ
//!
//! 接続中のクライアントを接続順に管理し、ブロードキャスト対象を提供する。

use super::{
    entity::Connection,
    value_object::{ConnectionId, Timestamp},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionRegistry {
    /// 接続順
    connections: Vec<Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 接続を登録する。既に登録済みの場合は false を返し、何もしない
    pub fn add(&mut self, id: ConnectionId, connected_at: Timestamp) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.connections.push(Connection::new(id, connected_at));
        true
    }

    /// 接続を削除する（冪等）。登録されていた場合は true
    pub fn remove(&mut self, id: &ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|connection| &connection.id != id);
        self.connections.len() != before
    }

    /// ブロードキャスト対象（接続中の全ての接続、接続順）
    pub fn broadcast_targets(&self) -> Vec<ConnectionId> {
        self.connections
            .iter()
            .map(|connection| connection.id.clone())
            .collect()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.iter().any(|connection| &connection.id == id)
    }
}
