/// HTTP Control API for the media bridge
///
/// Provides the polling endpoint, the WebSocket media stream, and a health check

pub mod routes;
pub mod server;
pub mod types;
pub mod websocket;

pub use routes::{create_router, AppState};
pub use server::ControlServer;
pub use types::*;
