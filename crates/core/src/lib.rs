//! Media session bridge
//!
//! Reads the platform's current media session into a [`MediaSnapshot`],
//! extrapolating the playback position while a track is playing, and forwards
//! transport commands to it.

pub mod bridge;
pub mod command;
pub mod error;
pub mod models;
pub mod position;
pub mod time;

pub use bridge::*;
pub use command::*;
pub use error::{BridgeError, Result};
pub use models::*;
