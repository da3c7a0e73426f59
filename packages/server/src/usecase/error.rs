//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{MessagePushError, RepositoryError};

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// 接続の登録に失敗（同じ接続 ID が登録済み）
    #[error("failed to register connection: {0}")]
    Registration(#[from] RepositoryError),

    /// 履歴スナップショットを送信できなかった（登録は取り消し済み）
    #[error("failed to deliver history snapshot: {0}")]
    SnapshotDelivery(#[from] MessagePushError),
}

/// 投稿処理のエラー
///
/// 本文が空の投稿はエラーではなく、黙って破棄される（`Ok(None)`）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// メッセージは履歴に追加済みだが、ブロードキャストできなかった
    #[error("failed to broadcast message: {0}")]
    BroadcastFailed(#[from] MessagePushError),
}
