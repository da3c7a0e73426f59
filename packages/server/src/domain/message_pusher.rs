//! メッセージ送信（通知）の抽象化
//!
//! UseCase 層はこの trait を通じてクライアントにイベントを届ける。
//! どのような形式（JSON など）で送るかは実装側の責務。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, RelayEvent};

/// 接続ごとの送信キューに溜められるフレーム数の上限
///
/// 読み出しが止まったクライアントのキューが際限なく伸びないようにする。
/// 上限に達している間のフレームはそのクライアントに対してのみ破棄される。
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// クライアントへの送信チャンネル
///
/// 受信側は UI 層の送信ループが WebSocket へ書き出す。
/// `mpsc::channel(OUTBOUND_QUEUE_CAPACITY)` で生成する。
pub type PusherChannel = mpsc::Sender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 送信チャンネルの登録を解除（冪等）
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定のクライアントにイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントにイベントを送信
    ///
    /// 一部の送信先への失敗（キューが満杯・閉じている）は他の送信先に影響しない。
    /// エラーになるのはイベント自体を送信できない場合のみ。
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError>;
}
