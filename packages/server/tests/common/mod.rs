//! Shared helpers for the relay integration tests.

#![allow(dead_code)]

use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use chatrelay_server::{
    config::ServerConfig,
    domain::Relay,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRelayRepository},
    ui::Server,
    usecase::{GetRelayStateUseCase, RelayCoordinator},
};
use chatrelay_shared::time::{MonotonicClock, SystemClock};
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::Mutex, time};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for a frame before failing
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub fn test_config(history_capacity: usize) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        history_capacity,
        ..ServerConfig::default()
    }
}

/// Wire the server the same way the binary does
pub fn build_router(config: &ServerConfig) -> Router {
    let relay = Arc::new(Mutex::new(Relay::with_capacity(config.history_capacity)));
    let repository = Arc::new(InMemoryRelayRepository::new(relay));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));
    let relay_coordinator = Arc::new(RelayCoordinator::new(
        repository.clone(),
        message_pusher,
        Arc::new(MonotonicClock::new(SystemClock)),
    ));
    let get_relay_state_usecase = Arc::new(GetRelayStateUseCase::new(repository));

    Server::new(relay_coordinator, get_relay_state_usecase)
        .into_router(config)
        .expect("router")
}

/// Start an actual TCP server in the background and return its address
pub async fn start_server(history_capacity: usize) -> SocketAddr {
    let app = build_router(&test_config(history_capacity));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Connect to `/ws` and read the `chat:load` snapshot
pub async fn connect(addr: SocketAddr) -> (WsStream, serde_json::Value) {
    let url = format!("ws://{addr}/ws");
    let (mut ws, _) = tokio_tungstenite::connect_async(&url)
        .await
        .expect("ws connect");

    let load = recv_json(&mut ws).await;
    assert_eq!(load["type"], "chat:load");
    (ws, load)
}

/// Read the next text frame as JSON
pub async fn recv_json(ws: &mut WsStream) -> serde_json::Value {
    loop {
        let msg = time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timeout waiting for frame")
            .expect("stream ended")
            .expect("ws read error");

        if let tungstenite::Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("parse frame");
        }
    }
}

/// Assert that no text frame arrives within `wait`
pub async fn assert_silent(ws: &mut WsStream, wait: Duration) {
    if let Ok(Some(Ok(tungstenite::Message::Text(text)))) = time::timeout(wait, ws.next()).await {
        panic!("unexpected frame: {}", text.as_str());
    }
}

pub async fn send_json(ws: &mut WsStream, value: serde_json::Value) {
    ws.send(tungstenite::Message::Text(value.to_string().into()))
        .await
        .expect("send");
}

pub async fn send_chat(ws: &mut WsStream, text: &str, display_name: &str) {
    send_json(
        ws,
        serde_json::json!({
            "type": "chat:message",
            "text": text,
            "user": { "displayName": display_name, "email": null, "photoURL": null }
        }),
    )
    .await;
}

/// GET `/debug/history`
pub async fn relay_state(addr: SocketAddr) -> serde_json::Value {
    reqwest::get(format!("http://{addr}/debug/history"))
        .await
        .expect("debug request")
        .json()
        .await
        .expect("parse debug response")
}
