use std::sync::Arc;
use axum::{
    extract::{State, ws::{Message, WebSocket, WebSocketUpgrade}},
    http::Uri,
    response::{IntoResponse, Response},
};
use tracing::{info, debug, error, warn};
use futures_util::{StreamExt, SinkExt};

use crate::handlers::plain_health;
use crate::state::AppState;
use crate::websocket::dispatch::{handle_frame, FrameOutcome};
use crate::ws::conn::{ConnHandle, Outbound};

/// Entry point for every path outside the API: upgrades websocket requests
/// and answers anything else with the plain-text health body.
pub async fn websocket_handler(
    ws: Option<WebSocketUpgrade>,
    State(app_state): State<Arc<AppState>>,
    uri: Uri,
) -> Response {
    match ws {
        Some(ws) => {
            info!("New WebSocket connection attempt on {}", uri.path());
            let room = uri.path().trim_start_matches('/').to_string();
            ws.on_upgrade(move |socket| handle_socket(socket, room, app_state))
        }
        None => plain_health().await.into_response(),
    }
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, room: String, app_state: Arc<AppState>) {
    let (handle, mut outbound) = ConnHandle::channel();
    let connection_id = handle.id();
    info!("WebSocket connection established for room '{}' with connection_id: {}", room, connection_id);

    app_state.session.lock().await.connect(handle);
    app_state.content_sync.on_connect(connection_id, &room);

    let (mut sender, mut receiver) = socket.split();

    // Drain the outbound queue into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(out) = outbound.recv().await {
            match out {
                Outbound::Message(msg) => {
                    let text = match serde_json::to_string(&msg) {
                        Ok(text) => text,
                        Err(e) => {
                            error!("Failed to serialize message for {}: {}", connection_id, e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(text)).await.is_err() {
                        debug!("WebSocket send failed, client {} disconnected", connection_id);
                        break;
                    }
                }
                Outbound::Close => {
                    info!("Closing connection {}", connection_id);
                    if let Err(e) = sender.send(Message::Close(None)).await {
                        debug!("Close frame not sent to {}: {}", connection_id, e);
                    }
                    break;
                }
            }
        }
    });

    // Feed inbound frames to the session, one at a time
    let state = app_state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            let frame = match result {
                Ok(Message::Text(text)) => text.into_bytes(),
                Ok(Message::Binary(bytes)) => bytes,
                Ok(Message::Close(_)) => {
                    debug!("Client {} sent close frame", connection_id);
                    break;
                }
                Ok(_) => continue,
                Err(e) => {
                    warn!("WebSocket error on {}: {}", connection_id, e);
                    break;
                }
            };

            let outcome = handle_frame(&mut *state.session.lock().await, connection_id, &frame);
            if outcome == FrameOutcome::Opaque {
                state.content_sync.on_frame(connection_id, &frame);
            }
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    app_state.session.lock().await.disconnect(connection_id);
    app_state.content_sync.on_disconnect(connection_id);
    info!("WebSocket connection {} terminated", connection_id);
}
