//! HTTP and WebSocket front end for the media bridge

pub mod config;
pub mod control_api;

pub use config::{ConfigError, ServerConfig};
pub use control_api::ControlServer;
