//! Utilities shared by the chatrelay binaries.

pub mod logger;
pub mod time;
