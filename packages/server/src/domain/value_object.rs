//! 値オブジェクト
//!
//! 不変で、生成時に検証済みであることを型で保証する。

use uuid::Uuid;

use super::error::ValueObjectError;

/// 表示名が指定されなかった場合に使うプレースホルダー
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

/// 接続 ID
///
/// WebSocket のアップグレード完了時にサーバーが割り当てる。再接続は別の ID になる。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub(super) String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyConnectionId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// メッセージ ID（UUID v4）
///
/// 受理時にサーバーが採番する。クライアントから指定されることはない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// メッセージ本文
///
/// 前後の空白を除去した結果が空でないことを保証する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// 前後の空白を除去して生成する。空になった場合はエラー
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = trim_blank(&value);
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyMessageText);
        }
        if trimmed.len() == value.len() {
            return Ok(Self(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 表示名
///
/// 未指定・空文字（空白のみを含む）の場合は [`DEFAULT_DISPLAY_NAME`] になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn from_raw(value: Option<String>) -> Self {
        match value.as_deref().map(trim_blank) {
            Some(name) if !name.is_empty() => Self(name.to_string()),
            _ => Self::anonymous(),
        }
    }

    pub fn anonymous() -> Self {
        Self(DEFAULT_DISPLAY_NAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// タイムスタンプ（Unix ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// 前後の空白を除去する
///
/// Unicode の空白に加えて BOM（U+FEFF）も空白として扱う。
fn trim_blank(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}
