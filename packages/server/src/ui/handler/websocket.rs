//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, OUTBOUND_QUEUE_CAPACITY},
    infrastructure::dto::websocket::{MessageType, SubmitMessage},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // Every upgrade is a new logical connection, reconnects included
    let connection_id = ConnectionIdFactory::generate();
    tracing::debug!("Upgrading connection '{}'", connection_id.as_str());

    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Channel receiver for the snapshot and broadcast frames
/// * `sender` - WebSocket sink to send messages to this client
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);

    // Frames are queued in the channel in order: the snapshot first, then broadcasts
    let mut send_task = pusher_loop(rx, sender);

    if let Err(e) = state
        .relay_coordinator
        .on_connect(connection_id.clone(), tx)
        .await
    {
        tracing::error!("Failed to connect client '{}': {}", connection_id.as_str(), e);
        send_task.abort();
        return;
    }
    tracing::info!("Client '{}' connected and registered", connection_id.as_str());

    let connection_id_clone = connection_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!(
                        "WebSocket error on '{}': {}",
                        connection_id_clone.as_str(),
                        e
                    );
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text(&state_clone, &connection_id_clone, text.as_str()).await;
                }
                Message::Binary(data) => {
                    tracing::debug!("Ignoring binary frame ({} bytes)", data.len());
                }
                Message::Ping(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection_id_clone.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Cleanup runs on every exit path: close frame, socket error, task failure
    if state.relay_coordinator.on_disconnect(&connection_id).await {
        tracing::info!(
            "Client '{}' disconnected and removed from registry",
            connection_id.as_str()
        );
    }
}

/// Parse one inbound text frame and hand it to the coordinator.
///
/// Frames that do not parse are dropped; nothing is sent back to the client.
async fn handle_text(state: &AppState, origin: &ConnectionId, text: &str) {
    let submit = match serde_json::from_str::<SubmitMessage>(text) {
        Ok(submit) => submit,
        Err(e) => {
            tracing::warn!("Failed to parse message from '{}': {}", origin.as_str(), e);
            return;
        }
    };

    if submit.r#type != MessageType::ChatMessage {
        tracing::warn!(
            "Unexpected message type {:?} from '{}'",
            submit.r#type,
            origin.as_str()
        );
        return;
    }

    match state
        .relay_coordinator
        .on_submit(origin.clone(), submit.into())
        .await
    {
        Ok(Some(message)) => {
            tracing::debug!("Accepted message '{}' from '{}'", message.id, origin.as_str());
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!("Failed to relay message from '{}': {}", origin.as_str(), e);
        }
    }
}
