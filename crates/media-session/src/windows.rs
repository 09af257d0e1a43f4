//! Windows media session access via System Media Transport Controls (SMTC)
//!
//! Any application that publishes to SMTC (Spotify, browsers, the Media
//! Player app, ...) shows up here as the current session.
//!
//! Requires Windows 10 version 1803 or later.

use crate::{
    MediaPlatform, MediaProperties, PlaybackInfo, Session, SessionManager, TimelineProperties,
};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tracing::debug;
use windows::{
    core::RuntimeType,
    Foundation::IAsyncOperation,
    Media::Control::{
        GlobalSystemMediaTransportControlsSession, GlobalSystemMediaTransportControlsSessionManager,
    },
};

pub struct SmtcPlatform;

impl SmtcPlatform {
    pub fn new() -> Self {
        Self
    }
}

/// Wait for a WinRT async operation without stalling the runtime
///
/// `IAsyncOperation::get` blocks the calling thread, so it is moved onto the
/// blocking pool.
async fn complete<T>(operation: IAsyncOperation<T>) -> Result<T>
where
    T: RuntimeType + Send + 'static,
{
    tokio::task::spawn_blocking(move || operation.get())
        .await
        .context("SMTC worker task failed")?
        .map_err(|e| anyhow!("SMTC async operation failed: {}", e))
}

#[async_trait]
impl MediaPlatform for SmtcPlatform {
    async fn request_session_manager(&self) -> Result<Box<dyn SessionManager>> {
        let operation = GlobalSystemMediaTransportControlsSessionManager::RequestAsync()
            .map_err(|e| anyhow!("Failed to create RequestAsync operation: {}", e))?;
        let manager = complete(operation).await?;
        Ok(Box::new(SmtcManager { manager }))
    }
}

struct SmtcManager {
    manager: GlobalSystemMediaTransportControlsSessionManager,
}

impl SessionManager for SmtcManager {
    fn current_session(&self) -> Result<Option<Box<dyn Session>>> {
        match self.manager.GetCurrentSession() {
            Ok(session) => Ok(Some(Box::new(SmtcSession { session }))),
            Err(e) if is_missing_session(&e) => {
                debug!("No current session");
                Ok(None)
            }
            Err(e) => Err(anyhow!("Failed to get current session: {}", e)),
        }
    }
}

/// SMTC reports "no session" as a null result, which windows-rs surfaces as
/// an error carrying a success code
fn is_missing_session(error: &windows::core::Error) -> bool {
    error.code().is_ok()
}

struct SmtcSession {
    session: GlobalSystemMediaTransportControlsSession,
}

#[async_trait]
impl Session for SmtcSession {
    async fn media_properties(&self) -> Result<MediaProperties> {
        let operation = self
            .session
            .TryGetMediaPropertiesAsync()
            .map_err(|e| anyhow!("Failed to get media properties: {}", e))?;
        let props = complete(operation).await?;

        let title = props.Title()?.to_string();
        let artist = props.Artist()?.to_string();

        debug!("SMTC metadata: title={}, artist={}", title, artist);

        Ok(MediaProperties { title, artist })
    }

    fn timeline_properties(&self) -> Result<TimelineProperties> {
        let timeline = self
            .session
            .GetTimelineProperties()
            .map_err(|e| anyhow!("Failed to get timeline properties: {}", e))?;

        Ok(TimelineProperties {
            position_ticks: timeline.Position()?.Duration,
            last_updated_ticks: timeline.LastUpdatedTime()?.UniversalTime,
            end_time_ticks: timeline.EndTime()?.Duration,
        })
    }

    fn playback_info(&self) -> Result<PlaybackInfo> {
        let info = self
            .session
            .GetPlaybackInfo()
            .map_err(|e| anyhow!("Failed to get playback info: {}", e))?;

        Ok(PlaybackInfo {
            playback_status: info.PlaybackStatus()?.0,
        })
    }

    async fn play(&self) -> Result<bool> {
        complete(self.session.TryPlayAsync()?).await
    }

    async fn pause(&self) -> Result<bool> {
        complete(self.session.TryPauseAsync()?).await
    }

    async fn skip_next(&self) -> Result<bool> {
        complete(self.session.TrySkipNextAsync()?).await
    }

    async fn skip_previous(&self) -> Result<bool> {
        complete(self.session.TrySkipPreviousAsync()?).await
    }
}
