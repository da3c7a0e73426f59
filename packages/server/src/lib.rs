//! Real-time chat relay library.
//!
//! Accepts chat messages over WebSocket, keeps a bounded window of recent
//! messages in memory, and fans every accepted message out to all connections.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
