//! InMemory Relay Repository 実装
//!
//! ドメイン層が定義する RelayRepository trait の具体的な実装。
//! Relay 集約をそのままインメモリのストレージとして使用します。
//! プロセスの終了とともに履歴は失われます。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ConnectionId, Relay, RelayRepository, RelayState, RepositoryError, Timestamp,
};

/// インメモリ Relay Repository 実装
pub struct InMemoryRelayRepository {
    /// Relay ドメインモデル
    relay: Arc<Mutex<Relay>>,
}

impl InMemoryRelayRepository {
    /// 新しい InMemoryRelayRepository を作成
    pub fn new(relay: Arc<Mutex<Relay>>) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl RelayRepository for InMemoryRelayRepository {
    async fn add_connection(
        &self,
        connection_id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut relay = self.relay.lock().await;
        relay.join(connection_id, connected_at)
    }

    async fn remove_connection(&self, connection_id: &ConnectionId) -> bool {
        let mut relay = self.relay.lock().await;
        relay.leave(connection_id)
    }

    async fn append_message(&self, message: ChatMessage) -> Vec<ConnectionId> {
        let mut relay = self.relay.lock().await;
        relay.accept(message)
    }

    async fn get_state(&self) -> RelayState {
        let relay = self.relay.lock().await;
        relay.state()
    }
}
