//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドは Relay 集約に対してアトミックに実行されることを実装側が保証する。

use async_trait::async_trait;

use super::{ChatMessage, ConnectionId, RelayState, RepositoryError, Timestamp};

/// Relay Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
/// 将来、永続化されたバックエンドに差し替えられるようにするための境界。
#[async_trait]
pub trait RelayRepository: Send + Sync {
    /// 接続を登録し、同時に履歴のスナップショットを取得
    async fn add_connection(
        &self,
        connection_id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// 接続を削除（冪等）。登録されていた場合は true
    async fn remove_connection(&self, connection_id: &ConnectionId) -> bool;

    /// メッセージを履歴に追加し、その時点のブロードキャスト対象を取得
    async fn append_message(&self, message: ChatMessage) -> Vec<ConnectionId>;

    /// 容量・接続一覧（接続順）・履歴（古い順）を同じ時点で取得
    async fn get_state(&self) -> RelayState;
}
