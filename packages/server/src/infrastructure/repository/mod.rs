//! Repository の実装
//!
//! - `inmemory`: プロセス内のメモリに保持する実装

pub mod inmemory;

pub use inmemory::InMemoryRelayRepository;
