//! Infrastructure 層
//!
//! ドメイン層の trait の具体的な実装と、通信で使う DTO を提供する。

pub mod dto;
pub mod message_pusher;
pub mod repository;
