/// Route handlers for the Control API

use super::types::*;
use super::websocket::media_stream;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use mediabridge_core::{BridgeError, MediaBridge};
use std::time::Duration;
use tracing::{debug, error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub bridge: MediaBridge,
    /// Delay between snapshots on the media stream
    pub poll_interval: Duration,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/media", get(media))
        .route("/ws/media", get(media_stream))
        .route("/health", get(health_check))
        .with_state(state)
}

/// GET /media - Current media, or send a transport command with `?action=`
async fn media(State(state): State<AppState>, Query(query): Query<MediaQuery>) -> Response {
    match query.action {
        None => {
            debug!("GET /media");

            match state.bridge.query_media_info().await {
                Ok(snapshot) => Json(snapshot).into_response(),
                Err(e) => bridge_error_response("Failed to query media", e),
            }
        }
        Some(action) => {
            info!("GET /media?action={}", action);

            match state.bridge.send_command(&action).await {
                Ok(result) => Json(result).into_response(),
                Err(e) => bridge_error_response("Failed to send command", e),
            }
        }
    }
}

/// Map a platform failure onto an HTTP error
pub(crate) fn bridge_error_response(context: &str, err: BridgeError) -> Response {
    error!("{}: {}", context, err);

    let status = match err {
        BridgeError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        BridgeError::Platform(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let response = ErrorResponse {
        error: context.to_string(),
        details: Some(err.to_string()),
    };
    (status, Json(response)).into_response()
}

/// GET /health - Health check endpoint
async fn health_check() -> Response {
    let response = serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    });

    Json(response).into_response()
}
