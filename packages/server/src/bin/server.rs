//! Chat relay server.
//!
//! Relays chat messages between WebSocket clients and replays recent history
//! to each new connection.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatrelay-server
//! cargo run --bin chatrelay-server -- --port 3000 --origin http://localhost:5173
//! ```

use std::{collections::HashMap, sync::Arc};

use chatrelay_server::{
    config::{Args, ServerConfig},
    domain::Relay,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRelayRepository},
    ui::Server,
    usecase::{GetRelayStateUseCase, RelayCoordinator},
};
use chatrelay_shared::{
    logger::setup_logger,
    time::{MonotonicClock, SystemClock},
};
use clap::Parser;
use tokio::sync::Mutex;

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = match ServerConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repository (in-memory history and registry)
    let relay = Arc::new(Mutex::new(Relay::with_capacity(config.history_capacity)));
    let repository = Arc::new(InMemoryRelayRepository::new(relay));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

    // 3. Create UseCases
    let clock = Arc::new(MonotonicClock::new(SystemClock));
    let relay_coordinator = Arc::new(RelayCoordinator::new(
        repository.clone(),
        message_pusher,
        clock,
    ));
    let get_relay_state_usecase = Arc::new(GetRelayStateUseCase::new(repository));

    // 4. Create and run the server
    let server = Server::new(relay_coordinator, get_relay_state_usecase);
    if let Err(e) = server.run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
