//! UseCase 層
//!
//! ドメインの操作を組み合わせ、接続のライフサイクルに沿った処理を提供する。

mod error;
mod get_relay_state;
mod relay_coordinator;

pub use error::{ConnectError, SubmitError};
pub use get_relay_state::GetRelayStateUseCase;
pub use relay_coordinator::RelayCoordinator;
