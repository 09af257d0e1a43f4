//! WebSocket media stream
//!
//! Pushes a media snapshot to the client on a fixed cadence until the client
//! goes away. Each connection polls the bridge on its own; a platform failure
//! ends only the connection that hit it.

use super::routes::AppState;
use super::types::ErrorResponse;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use mediabridge_core::MediaBridge;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// GET /ws/media - WebSocket upgrade handler
pub async fn media_stream(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| stream_media(socket, state.bridge, state.poll_interval))
}

async fn stream_media(socket: WebSocket, bridge: MediaBridge, poll_interval: Duration) {
    let (mut sender, mut receiver) = socket.split();

    info!("Media stream client connected");

    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let frame = match bridge.query_media_info().await {
                    Ok(snapshot) => serde_json::to_string(&snapshot),
                    Err(e) => {
                        warn!("Ending media stream after platform failure: {}", e);
                        let response = ErrorResponse {
                            error: "Failed to query media".to_string(),
                            details: Some(e.to_string()),
                        };
                        if let Ok(json) = serde_json::to_string(&response) {
                            let _ = sender.send(Message::Text(json)).await;
                        }
                        let _ = sender.send(Message::Close(None)).await;
                        break;
                    }
                };

                let json = match frame {
                    Ok(json) => json,
                    Err(e) => {
                        warn!("Ending media stream, failed to encode snapshot: {}", e);
                        break;
                    }
                };
                if sender.send(Message::Text(json)).await.is_err() {
                    info!("Media stream client went away");
                    break;
                }
            }
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => {
                    info!("Media stream client disconnected");
                    break;
                }
                Some(Err(e)) => {
                    warn!("Media stream connection error: {}", e);
                    break;
                }
                Some(Ok(other)) => {
                    debug!("Ignoring client message on media stream: {:?}", other);
                }
            },
        }
    }
}
