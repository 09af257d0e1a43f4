//! Platform media session capability
//!
//! This crate describes the one thing the bridge needs from the operating
//! system: a manager that hands out the *current* media session, and a session
//! that can be read and sent transport commands.
//!
//! - Windows: System Media Transport Controls (SMTC)
//! - Other targets: an in-memory platform that never has a session
//!
//! All timestamps are left in the platform's native representation (100ns
//! ticks); converting them is the caller's job.

use anyhow::Result;
use async_trait::async_trait;

pub mod memory;

#[cfg(target_os = "windows")]
mod windows;

/// Title and artist of the media owned by a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaProperties {
    pub title: String,
    pub artist: String,
}

/// Raw timeline snapshot as reported by the platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineProperties {
    /// Last reported playback offset, in 100ns ticks
    pub position_ticks: i64,
    /// When `position_ticks` was captured, in 100ns ticks since 1601-01-01 UTC
    pub last_updated_ticks: i64,
    /// Track end offset, in 100ns ticks
    pub end_time_ticks: i64,
}

/// Raw playback info as reported by the platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackInfo {
    pub playback_status: i32,
}

/// Entry point into the platform's media session facilities
#[async_trait]
pub trait MediaPlatform: Send + Sync {
    /// Request a fresh session manager handle
    async fn request_session_manager(&self) -> Result<Box<dyn SessionManager>>;
}

/// Short-lived handle used to look up the current session
pub trait SessionManager: Send + Sync {
    /// The session that currently owns media-transport focus, if any
    fn current_session(&self) -> Result<Option<Box<dyn Session>>>;
}

/// A live media session owned by some application
///
/// Transport methods return the platform's acceptance flag. The platform does
/// not guarantee the application acted on it.
#[async_trait]
pub trait Session: Send + Sync {
    async fn media_properties(&self) -> Result<MediaProperties>;

    fn timeline_properties(&self) -> Result<TimelineProperties>;

    fn playback_info(&self) -> Result<PlaybackInfo>;

    async fn play(&self) -> Result<bool>;

    async fn pause(&self) -> Result<bool>;

    async fn skip_next(&self) -> Result<bool>;

    async fn skip_previous(&self) -> Result<bool>;
}

/// Create the media platform for the current target
pub fn create_media_platform() -> Box<dyn MediaPlatform> {
    #[cfg(target_os = "windows")]
    return Box::new(windows::SmtcPlatform::new());

    #[cfg(not(target_os = "windows"))]
    {
        tracing::warn!("No media session support on this platform, sessions will never be found");
        Box::new(memory::InMemoryPlatform::new())
    }
}
