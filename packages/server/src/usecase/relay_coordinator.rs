//! UseCase: 接続・投稿・切断の調停
//!
//! ## 概要
//!
//! 接続のライフサイクルの 3 つのイベントを、それぞれメソッドとして受け取る。
//!
//! - `on_connect`: 接続を登録し、その接続だけに履歴のスナップショットを送る
//! - `on_submit`: 投稿を正規化し、履歴に追加して全接続（送信者を含む）へブロードキャスト
//! - `on_disconnect`: 接続を登録解除する。履歴には触れない
//!
//! ## 順序の保証
//!
//! 3 つの操作は `sequence` ロックで直列化される。スナップショットの取得・送信と
//! 投稿の追加・ブロードキャストが交差しないため、新しい接続は
//! 「接続前に受理されたメッセージはスナップショットで、接続後のものはブロードキャストで」
//! 重複も欠落もなく受け取る。送信はチャンネルへの投入のみでブロックしない。
//!
//! ## テスト実装の作業記録
//!
//! ### どのような状況を想定しているか
//! - 正常系：スナップショットの送信、送信者を含むブロードキャスト
//! - 異常系：スナップショットの送信失敗（登録の取り消し）
//! - エッジケース：空の投稿、容量超過、途中参加、並行した投稿

use std::sync::Arc;

use chatrelay_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ConnectionId, MessageNormalizer, MessagePusher, PusherChannel, RelayEvent,
    RelayRepository, Submission, Timestamp,
};

use super::error::{ConnectError, SubmitError};

/// 接続・投稿・切断を調停するユースケース
pub struct RelayCoordinator {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RelayRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    normalizer: MessageNormalizer,
    clock: Arc<dyn Clock>,
    /// 状態を変更する操作の直列化
    sequence: Mutex<()>,
}

impl RelayCoordinator {
    /// 新しい RelayCoordinator を作成
    ///
    /// `clock` は履歴内のタイムスタンプが逆行しないよう、単調な時計を渡すこと
    /// （`MonotonicClock`）。
    pub fn new(
        repository: Arc<dyn RelayRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            normalizer: MessageNormalizer::new(clock.clone()),
            clock,
            sequence: Mutex::new(()),
        }
    }

    /// 接続を登録し、履歴のスナップショットをその接続だけに送信
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 新しい接続の ID
    /// * `sender` - その接続への送信チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続成功（接続時刻を返す）
    /// * `Err(ConnectError)` - 接続失敗（登録は残らない）
    pub async fn on_connect(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        let _sequence = self.sequence.lock().await;

        // 1. 登録とスナップショットの取得（アトミック）
        let connected_at = Timestamp::new(self.clock.now_millis());
        let messages = self
            .repository
            .add_connection(connection_id.clone(), connected_at)
            .await?;

        // 2. 送信チャンネルを登録
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        // 3. スナップショットを送信。失敗したら登録を取り消す
        let snapshot_len = messages.len();
        let event = RelayEvent::HistoryLoaded {
            connection_id: connection_id.clone(),
            messages,
        };
        if let Err(e) = self.message_pusher.push_to(&connection_id, &event).await {
            self.repository.remove_connection(&connection_id).await;
            self.message_pusher.unregister_client(&connection_id).await;
            return Err(e.into());
        }

        tracing::info!(
            "Sent history snapshot ({} messages) to '{}'",
            snapshot_len,
            connection_id.as_str()
        );
        Ok(connected_at)
    }

    /// 投稿を受け付ける
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ChatMessage))` - 受理され、全接続にブロードキャストされた
    /// * `Ok(None)` - 本文が空のため破棄（履歴・ブロードキャストとも変化なし）
    /// * `Err(SubmitError)` - 履歴には追加されたがブロードキャストできなかった
    pub async fn on_submit(
        &self,
        origin: ConnectionId,
        submission: Submission,
    ) -> Result<Option<ChatMessage>, SubmitError> {
        let _sequence = self.sequence.lock().await;

        let Some(message) = self.normalizer.normalize(submission, origin) else {
            tracing::debug!("Dropped empty submission");
            return Ok(None);
        };

        // 1. 履歴に追加し、その時点の接続を対象として取得
        let targets = self.repository.append_message(message.clone()).await;

        // 2. 送信者を含む全接続へブロードキャスト
        tracing::info!(
            "Broadcasting message '{}' from '{}' to {} clients",
            message.id,
            message.origin.as_str(),
            targets.len()
        );
        self.message_pusher
            .broadcast(targets, &RelayEvent::MessageAccepted(message.clone()))
            .await?;

        Ok(Some(message))
    }

    /// 接続を登録解除する（冪等）
    ///
    /// # Returns
    ///
    /// 登録されていた場合は true
    pub async fn on_disconnect(&self, connection_id: &ConnectionId) -> bool {
        let _sequence = self.sequence.lock().await;

        let removed = self.repository.remove_connection(connection_id).await;
        self.message_pusher.unregister_client(connection_id).await;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            MessagePushError, MockMessagePusher, OUTBOUND_QUEUE_CAPACITY, RawProfile, Relay,
            DEFAULT_DISPLAY_NAME,
        },
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRelayRepository,
        },
    };
    use chatrelay_shared::time::{FixedClock, MonotonicClock, SystemClock};
    use std::collections::{HashMap, HashSet};
    use tokio::sync::mpsc;

    fn create_test_repository(capacity: usize) -> Arc<InMemoryRelayRepository> {
        let relay = Arc::new(Mutex::new(Relay::with_capacity(capacity)));
        Arc::new(InMemoryRelayRepository::new(relay))
    }

    fn create_test_coordinator(capacity: usize) -> (RelayCoordinator, Arc<InMemoryRelayRepository>) {
        let repository = create_test_repository(capacity);
        let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));
        let coordinator = RelayCoordinator::new(
            repository.clone(),
            message_pusher,
            Arc::new(MonotonicClock::new(SystemClock)),
        );
        (coordinator, repository)
    }

    fn connection_id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    fn submission(text: &str) -> Submission {
        Submission::new(text, RawProfile::default())
    }

    async fn connect(
        coordinator: &RelayCoordinator,
        id: &str,
    ) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        coordinator.on_connect(connection_id(id), tx).await.unwrap();
        rx
    }

    /// 受信済みのフレームを全て取り出して JSON として返す
    fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<serde_json::Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }

    fn loaded_texts(frame: &serde_json::Value) -> Vec<String> {
        assert_eq!(frame["type"], "chat:load");
        frame["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["text"].as_str().unwrap().to_string())
            .collect()
    }

    fn broadcast_texts(frames: &[serde_json::Value]) -> Vec<String> {
        frames
            .iter()
            .filter(|f| f["type"] == "chat:message")
            .map(|f| f["message"]["text"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_on_connect_sends_empty_snapshot_with_own_id() {
        // テスト項目: 最初の接続には空のスナップショットと自分の接続 ID が送られる
        // given (前提条件):
        let (coordinator, repository) = create_test_coordinator(100);

        // when (操作):
        let mut rx = connect(&coordinator, "alice").await;

        // then (期待する結果):
        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["connectionId"], "alice");
        assert!(loaded_texts(&frames[0]).is_empty());
        assert_eq!(repository.get_state().await.connections.len(), 1);
    }

    #[tokio::test]
    async fn test_on_submit_broadcasts_to_all_including_sender() {
        // テスト項目: 受理されたメッセージが送信者を含む全接続に届く
        // given (前提条件):
        let (coordinator, repository) = create_test_coordinator(100);
        let mut rx_alice = connect(&coordinator, "alice").await;
        let mut rx_bob = connect(&coordinator, "bob").await;
        drain(&mut rx_alice);
        drain(&mut rx_bob);

        // when (操作):
        let accepted = coordinator
            .on_submit(connection_id("alice"), submission("  hi  "))
            .await
            .unwrap()
            .unwrap();

        // then (期待する結果):
        assert_eq!(accepted.text.as_str(), "hi");
        assert_eq!(accepted.sender.display_name.as_str(), DEFAULT_DISPLAY_NAME);
        for rx in [&mut rx_alice, &mut rx_bob] {
            let frames = drain(rx);
            assert_eq!(broadcast_texts(&frames), vec!["hi"]);
            assert_eq!(frames[0]["message"]["socketId"], "alice");
            assert_eq!(frames[0]["message"]["id"], accepted.id.to_string());
        }
        assert_eq!(repository.get_state().await.messages, vec![accepted]);
    }

    #[tokio::test]
    async fn test_on_submit_drops_empty_text_silently() {
        // テスト項目: 空白のみの投稿は履歴にもブロードキャストにも現れない
        // given (前提条件):
        let (coordinator, repository) = create_test_coordinator(100);
        let mut rx = connect(&coordinator, "alice").await;
        drain(&mut rx);

        // when (操作):
        let result = coordinator
            .on_submit(connection_id("alice"), submission("   "))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(None));
        assert!(drain(&mut rx).is_empty());
        assert!(repository.get_state().await.messages.is_empty());
    }

    #[tokio::test]
    async fn test_history_keeps_submission_order_within_capacity() {
        // テスト項目: 容量以内の N 件の投稿は、投稿順にそのまま履歴に残る
        // given (前提条件):
        let (coordinator, repository) = create_test_coordinator(100);

        // when (操作):
        for i in 0..100 {
            coordinator
                .on_submit(connection_id("alice"), submission(&format!("m{i}")))
                .await
                .unwrap();
        }

        // then (期待する結果):
        let history = repository.get_state().await.messages;
        let texts: Vec<&str> = history.iter().map(|m| m.text.as_str()).collect();
        let expected: Vec<String> = (0..100).map(|i| format!("m{i}")).collect();
        assert_eq!(texts, expected);
        assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_history_keeps_last_messages_over_capacity() {
        // テスト項目: 容量を超えると直近の 100 件だけが古い順に残る
        // given (前提条件):
        let (coordinator, repository) = create_test_coordinator(100);

        // when (操作):
        for i in 0..130 {
            coordinator
                .on_submit(connection_id("alice"), submission(&format!("m{i}")))
                .await
                .unwrap();
        }

        // then (期待する結果):
        let history = repository.get_state().await.messages;
        let texts: Vec<&str> = history.iter().map(|m| m.text.as_str()).collect();
        let expected: Vec<String> = (30..130).map(|i| format!("m{i}")).collect();
        assert_eq!(texts, expected);
    }

    #[tokio::test]
    async fn test_late_joiner_gets_snapshot_then_broadcasts() {
        // テスト項目: 途中参加した接続は、スナップショットの後に以降のメッセージを重複・欠落なく受け取る
        // given (前提条件):
        let (coordinator, _repository) = create_test_coordinator(3);
        for text in ["a", "b", "c", "d"] {
            coordinator
                .on_submit(connection_id("alice"), submission(text))
                .await
                .unwrap();
        }

        // when (操作):
        let mut rx = connect(&coordinator, "bob").await;
        for text in ["e", "f"] {
            coordinator
                .on_submit(connection_id("alice"), submission(text))
                .await
                .unwrap();
        }

        // then (期待する結果):
        let frames = drain(&mut rx);
        assert_eq!(loaded_texts(&frames[0]), vec!["b", "c", "d"]);
        assert_eq!(broadcast_texts(&frames[1..]), vec!["e", "f"]);
    }

    #[tokio::test]
    async fn test_on_disconnect_removes_target_and_keeps_history() {
        // テスト項目: 切断した接続にはもう配信されず、履歴は変わらない
        // given (前提条件):
        let (coordinator, repository) = create_test_coordinator(100);
        let mut rx_alice = connect(&coordinator, "alice").await;
        let mut rx_bob = connect(&coordinator, "bob").await;
        coordinator
            .on_submit(connection_id("bob"), submission("before"))
            .await
            .unwrap();
        let history_before = repository.get_state().await.messages;
        drain(&mut rx_alice);
        drain(&mut rx_bob);

        // when (操作):
        let removed = coordinator.on_disconnect(&connection_id("bob")).await;
        let removed_again = coordinator.on_disconnect(&connection_id("bob")).await;

        // then (期待する結果):
        assert!(removed);
        assert!(!removed_again);
        assert_eq!(repository.get_state().await.messages, history_before);

        coordinator
            .on_submit(connection_id("alice"), submission("after"))
            .await
            .unwrap();
        assert_eq!(broadcast_texts(&drain(&mut rx_alice)), vec!["after"]);
        assert!(drain(&mut rx_bob).is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_are_serialized() {
        // テスト項目: 並行した投稿は全て異なる ID で受理され、全接続が同じ順序で受け取る
        // given (前提条件):
        let (coordinator, repository) = create_test_coordinator(100);
        let coordinator = Arc::new(coordinator);
        let mut rx_alice = connect(&coordinator, "alice").await;
        let mut rx_bob = connect(&coordinator, "bob").await;
        drain(&mut rx_alice);
        drain(&mut rx_bob);

        // when (操作):
        let mut handles = Vec::new();
        for sender in ["alice", "bob"] {
            let coordinator = coordinator.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..20 {
                    coordinator
                        .on_submit(connection_id(sender), submission(&format!("{sender}-{i}")))
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let history = repository.get_state().await.messages;
        assert_eq!(history.len(), 40);
        let ids: HashSet<String> = history.iter().map(|m| m.id.to_string()).collect();
        assert_eq!(ids.len(), 40);

        let history_texts: Vec<String> = history
            .iter()
            .map(|m| m.text.as_str().to_string())
            .collect();
        assert_eq!(broadcast_texts(&drain(&mut rx_alice)), history_texts);
        assert_eq!(broadcast_texts(&drain(&mut rx_bob)), history_texts);
    }

    #[tokio::test]
    async fn test_on_connect_rolls_back_when_snapshot_fails() {
        // テスト項目: スナップショットの送信に失敗した場合、登録が取り消される
        // given (前提条件):
        let repository = create_test_repository(100);
        let mut message_pusher = MockMessagePusher::new();
        message_pusher
            .expect_register_client()
            .times(1)
            .returning(|_, _| ());
        message_pusher
            .expect_push_to()
            .times(1)
            .returning(|id, _| Err(MessagePushError::PushFailed(id.as_str().to_string())));
        message_pusher
            .expect_unregister_client()
            .times(1)
            .returning(|_| ());
        let coordinator = RelayCoordinator::new(
            repository.clone(),
            Arc::new(message_pusher),
            Arc::new(FixedClock::new(1000)),
        );

        // when (操作):
        let (tx, _rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        let result = coordinator.on_connect(connection_id("alice"), tx).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConnectError::SnapshotDelivery(MessagePushError::PushFailed(
                "alice".to_string()
            )))
        );
        assert!(repository.get_state().await.connections.is_empty());
    }

    #[tokio::test]
    async fn test_on_submit_empty_never_reaches_pusher() {
        // テスト項目: 空の投稿では MessagePusher が一切呼ばれない
        // given (前提条件):
        let repository = create_test_repository(100);
        let mut message_pusher = MockMessagePusher::new();
        message_pusher.expect_broadcast().times(0);
        message_pusher.expect_push_to().times(0);
        let coordinator = RelayCoordinator::new(
            repository.clone(),
            Arc::new(message_pusher),
            Arc::new(FixedClock::new(1000)),
        );

        // when (操作):
        let result = coordinator
            .on_submit(connection_id("alice"), submission("\t \n"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(None));
        assert!(repository.get_state().await.messages.is_empty());
    }

    #[tokio::test]
    async fn test_on_submit_reports_broadcast_error_after_append() {
        // テスト項目: ブロードキャスト自体が失敗した場合はエラーになるが、履歴には残る
        // given (前提条件):
        let repository = create_test_repository(100);
        let mut message_pusher = MockMessagePusher::new();
        message_pusher
            .expect_broadcast()
            .times(1)
            .returning(|_, _| Err(MessagePushError::Serialization("boom".to_string())));
        let coordinator = RelayCoordinator::new(
            repository.clone(),
            Arc::new(message_pusher),
            Arc::new(FixedClock::new(1000)),
        );

        // when (操作):
        let result = coordinator
            .on_submit(connection_id("alice"), submission("hello"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SubmitError::BroadcastFailed(MessagePushError::Serialization(
                "boom".to_string()
            )))
        );
        assert_eq!(repository.get_state().await.messages.len(), 1);
    }
}
