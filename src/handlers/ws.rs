// src/handlers/ws.rs

use std::sync::Arc;

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use crate::session::{SessionCoordinator, events::ClientEvent};

/// Upgrades the connection into a real-time game channel.
#[utoipa::path(
    get,
    path = "/ws",
    tag = "realtime",
    responses((status = 101, description = "Switching protocols to WebSocket"))
)]
pub async fn ws_handler(
    State(sessions): State<Arc<SessionCoordinator>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(sessions, socket))
}

/// Runs one client connection until it closes.
///
/// Outbound events are drained by a dedicated writer task so broadcasts never
/// wait on this connection's reads.
async fn handle_socket(sessions: Arc<SessionCoordinator>, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (connection, mut outbound) = sessions.hub().connect();
    info!(%connection, "client connected");

    let writer_task = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(error = %err, event = event.name(), "failed to serialize event");
                    continue;
                }
            };
            if sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match ClientEvent::from_json_str(text.as_str()) {
                Ok(event) => sessions.handle_event(connection, event).await,
                Err(err) => {
                    warn!(%connection, error = %err, "failed to parse client message");
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(%connection, error = %err, "websocket error");
                break;
            }
        }
    }

    // Dropping the hub sender ends the writer loop.
    sessions.disconnect(connection);
    let _ = writer_task.await;
    info!(%connection, "client disconnected");
}
