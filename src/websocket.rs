use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::Response,
};
use axum::extract::ws::WebSocket;
use tracing::{info, error};
use futures_util::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::handlers;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = state.generate_connection_id();
    info!("New channel connection: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();

    // Calls on one connection are answered in the order they arrive.
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let reply = handlers::handle_frame(&state, &text).await;
                let payload = match serde_json::to_string(&reply) {
                    Ok(payload) => payload,
                    Err(e) => {
                        error!("Failed to encode reply: {}", e);
                        continue;
                    }
                };
                if let Err(e) = sender.send(Message::Text(payload)).await {
                    error!("Failed to send reply to {}: {}", connection_id, e);
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                info!("Channel connection {} closed", connection_id);
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    info!("Cleaned up channel connection {}", connection_id);
}
