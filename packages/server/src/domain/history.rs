//! 履歴バッファ
//!
//! 直近に受理されたメッセージを古い順に保持する固定長のバッファ。
//! 容量を超えた場合は最も古いメッセージを 1 件だけ捨てる（FIFO）。
//!
//! 内部で排他制御は行わない。呼び出し側（RelayCoordinator）が書き込みを直列化する。

use std::collections::VecDeque;

use super::entity::ChatMessage;

/// 履歴の既定の容量
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryBuffer {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl HistoryBuffer {
    /// 容量を指定して生成
    ///
    /// 容量 0 は 1 として扱う。
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// 末尾に追加する。容量を超えた場合は先頭を 1 件取り除いて返す
    pub fn append(&mut self, message: ChatMessage) -> Option<ChatMessage> {
        self.messages.push_back(message);
        if self.messages.len() > self.capacity {
            return self.messages.pop_front();
        }
        None
    }

    /// 現在の内容のコピーを古い順に返す
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// 既定の容量（100 件）
impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}
