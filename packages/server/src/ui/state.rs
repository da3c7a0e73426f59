//! Shared application state.

use std::sync::Arc;

use crate::usecase::{GetRelayStateUseCase, RelayCoordinator};

/// Shared application state
pub struct AppState {
    /// RelayCoordinator（接続・投稿・切断の調停）
    pub relay_coordinator: Arc<RelayCoordinator>,
    /// GetRelayStateUseCase（状態取得のユースケース）
    pub get_relay_state_usecase: Arc<GetRelayStateUseCase>,
}
