//! UseCase: Relay の現在の状態を取得（読み取り専用）

use std::sync::Arc;

use crate::domain::{RelayRepository, RelayState};

/// Relay の状態取得のユースケース
pub struct GetRelayStateUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
}

impl GetRelayStateUseCase {
    /// 新しい GetRelayStateUseCase を作成
    pub fn new(repository: Arc<dyn RelayRepository>) -> Self {
        Self { repository }
    }

    /// 状態取得を実行
    ///
    /// 容量・接続一覧・履歴は同じ時点のものが返る。
    pub async fn execute(&self) -> RelayState {
        self.repository.get_state().await
    }
}
