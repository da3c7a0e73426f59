//! メッセージの正規化
//!
//! クライアントからの投稿を検証し、受理可能なものだけを [`ChatMessage`] に変換する。
//! 本文が空（空白のみ）の投稿は黙って破棄する。エラーは返さない。
//!
//! 文字数制限・内容のフィルタリング・流量制限は行わない。

use std::sync::Arc;

use chatrelay_shared::time::Clock;

use super::{
    entity::{ChatMessage, SenderProfile},
    factory::MessageIdFactory,
    value_object::{ConnectionId, DisplayName, MessageText, Timestamp},
};

/// 正規化前のプロフィール（クライアントの申告そのまま）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProfile {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

/// 正規化前の投稿
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub text: String,
    pub profile: RawProfile,
}

impl Submission {
    pub fn new(text: impl Into<String>, profile: RawProfile) -> Self {
        Self {
            text: text.into(),
            profile,
        }
    }
}

pub struct MessageNormalizer {
    clock: Arc<dyn Clock>,
}

impl MessageNormalizer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// 投稿を正規化する
    ///
    /// # Returns
    ///
    /// * `Some(ChatMessage)` - 受理（ID とサーバー時刻を付与済み）
    /// * `None` - 本文が空のため破棄
    pub fn normalize(&self, submission: Submission, origin: ConnectionId) -> Option<ChatMessage> {
        let text = MessageText::new(submission.text).ok()?;

        let RawProfile {
            display_name,
            email,
            photo_url,
        } = submission.profile;
        let sender = SenderProfile::new(DisplayName::from_raw(display_name), email, photo_url);

        Some(ChatMessage::new(
            MessageIdFactory::generate(),
            text,
            sender,
            Timestamp::new(self.clock.now_millis()),
            origin,
        ))
    }
}
