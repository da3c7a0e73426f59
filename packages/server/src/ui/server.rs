//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use thiserror::Error;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::{ConfigError, ServerConfig},
    usecase::{GetRelayStateUseCase, RelayCoordinator},
};

use super::{
    handler::{debug_relay_state, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Errors that stop the server from starting or serving
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// WebSocket chat relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(relay_coordinator, get_relay_state_usecase);
/// server.run(&config).await?;
/// ```
pub struct Server {
    /// RelayCoordinator（接続・投稿・切断の調停）
    relay_coordinator: Arc<RelayCoordinator>,
    /// GetRelayStateUseCase（状態取得のユースケース）
    get_relay_state_usecase: Arc<GetRelayStateUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        relay_coordinator: Arc<RelayCoordinator>,
        get_relay_state_usecase: Arc<GetRelayStateUseCase>,
    ) -> Self {
        Self {
            relay_coordinator,
            get_relay_state_usecase,
        }
    }

    /// Build the router with CORS and request tracing applied
    ///
    /// # Errors
    ///
    /// Returns an error if one of the allowed origins is not a valid header value.
    pub fn into_router(self, config: &ServerConfig) -> Result<Router, ServerError> {
        let app_state = Arc::new(AppState {
            relay_coordinator: self.relay_coordinator,
            get_relay_state_usecase: self.get_relay_state_usecase,
        });

        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::list(config.origin_header_values()?))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true);

        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/health", get(health_check))
            .route("/debug/history", get(debug_relay_state))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        Ok(app)
    }

    /// Run the relay server until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, if the server fails to
    /// bind to the configured address, or if serving fails.
    pub async fn run(self, config: &ServerConfig) -> Result<(), ServerError> {
        let app = self.into_router(config)?;

        // Bind the server to the host and port
        let bind_addr = config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Chat relay server listening on {} (history capacity {}, allowed origins {:?})",
            listener.local_addr()?,
            config.history_capacity,
            config.allowed_origins
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
