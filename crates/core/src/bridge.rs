use chrono::{DateTime, Utc};
use mediabridge_media_session::{MediaPlatform, Session};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::command::TransportCommand;
use crate::error::{BridgeError, Result};
use crate::models::{CommandResult, MediaInfo, MediaSnapshot, PlaybackStatus, TimelineSample};

/// Bridge tuning
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Upper bound for each suspendable platform call; `None` waits forever
    pub platform_timeout: Option<Duration>,
}

/// Reads and drives the platform's current media session
///
/// Holds no session state: every call requests a fresh session manager, so
/// clones can be used concurrently without coordination.
#[derive(Clone)]
pub struct MediaBridge {
    platform: Arc<dyn MediaPlatform>,
    config: BridgeConfig,
}

impl MediaBridge {
    pub fn new(platform: Arc<dyn MediaPlatform>) -> Self {
        Self::with_config(platform, BridgeConfig::default())
    }

    pub fn with_config(platform: Arc<dyn MediaPlatform>, config: BridgeConfig) -> Self {
        Self { platform, config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Snapshot of the current session
    pub async fn query_media_info(&self) -> Result<MediaSnapshot> {
        self.snapshot(Utc::now).await
    }

    /// Snapshot of the current session, extrapolating the position to `now`
    pub async fn query_media_info_at(&self, now: DateTime<Utc>) -> Result<MediaSnapshot> {
        self.snapshot(|| now).await
    }

    /// Forward a transport command to the current session
    ///
    /// The token is matched case-insensitively and validated before the
    /// platform is contacted. "Sent" only means the platform was asked.
    pub async fn send_command(&self, token: &str) -> Result<CommandResult> {
        let Ok(command) = token.parse::<TransportCommand>() else {
            debug!("Rejecting undefined command {:?}", token);
            return Ok(CommandResult::undefined(token));
        };

        let Some(session) = self.current_session().await? else {
            return Ok(CommandResult::not_found());
        };

        let accepted = match command {
            TransportCommand::Play => self.bounded(session.play()).await?,
            TransportCommand::Pause => self.bounded(session.pause()).await?,
            TransportCommand::Next => self.bounded(session.skip_next()).await?,
            TransportCommand::Previous => self.bounded(session.skip_previous()).await?,
        };

        info!("Sent '{}' to media session (accepted: {})", command, accepted);
        Ok(CommandResult::sent(command.as_str()))
    }

    async fn snapshot(&self, now: impl FnOnce() -> DateTime<Utc>) -> Result<MediaSnapshot> {
        let Some(session) = self.current_session().await? else {
            debug!("No current media session");
            return Ok(MediaSnapshot::not_found());
        };

        let properties = self.bounded(session.media_properties()).await?;
        let timeline = TimelineSample::from(session.timeline_properties()?);
        let status = PlaybackStatus::from(session.playback_info()?.playback_status);

        let now = now();
        let info = MediaInfo {
            title: properties.title,
            artist: properties.artist,
            status,
            position: timeline.position_at(now, status),
            duration: timeline.duration(),
        };

        debug!(
            "Media snapshot: {} - {} [{}] {}/{}",
            info.artist, info.title, info.status, info.position, info.duration
        );
        Ok(MediaSnapshot::Active(info))
    }

    async fn current_session(&self) -> Result<Option<Box<dyn Session>>> {
        let manager = self.bounded(self.platform.request_session_manager()).await?;
        Ok(manager.current_session()?)
    }

    /// Await a platform call, applying the configured timeout
    async fn bounded<T>(&self, call: impl Future<Output = anyhow::Result<T>>) -> Result<T> {
        match self.config.platform_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| BridgeError::Timeout(limit))?
                .map_err(BridgeError::from),
            None => call.await.map_err(BridgeError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClockTime;
    use crate::time::TICKS_PER_SECOND;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use mediabridge_media_session::memory::{InMemoryPlatform, SessionState, TransportAction};
    use mediabridge_media_session::{
        MediaProperties, PlaybackInfo, SessionManager, TimelineProperties,
    };

    /// 2024-05-01T12:00:00Z in platform ticks
    const CAPTURED_TICKS: i64 = 133_590_384_000_000_000;

    fn captured_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn session(status: i32) -> SessionState {
        SessionState {
            properties: MediaProperties {
                title: "Time".to_string(),
                artist: "Pink Floyd".to_string(),
            },
            timeline: TimelineProperties {
                position_ticks: 90 * TICKS_PER_SECOND,
                last_updated_ticks: CAPTURED_TICKS,
                end_time_ticks: 413 * TICKS_PER_SECOND,
            },
            playback: PlaybackInfo { playback_status: status },
        }
    }

    fn bridge(platform: &InMemoryPlatform) -> MediaBridge {
        MediaBridge::new(Arc::new(platform.clone()))
    }

    #[test]
    fn test_captured_ticks_constant() {
        assert_eq!(crate::time::from_platform_ticks(CAPTURED_TICKS), captured_at());
    }

    #[tokio::test]
    async fn test_query_without_session() {
        let platform = InMemoryPlatform::new();
        let snapshot = bridge(&platform).query_media_info().await.unwrap();

        assert_eq!(snapshot, MediaSnapshot::not_found());
        assert_eq!(platform.manager_requests(), 1);
    }

    #[tokio::test]
    async fn test_query_playing_session_extrapolates() {
        let platform = InMemoryPlatform::with_session(session(4));
        let now = captured_at() + ChronoDuration::seconds(5);

        let snapshot = bridge(&platform).query_media_info_at(now).await.unwrap();

        assert_eq!(
            snapshot,
            MediaSnapshot::Active(MediaInfo {
                title: "Time".to_string(),
                artist: "Pink Floyd".to_string(),
                status: PlaybackStatus::Playing,
                position: ClockTime::from_secs(95),
                duration: ClockTime::from_secs(413),
            })
        );
    }

    #[tokio::test]
    async fn test_query_paused_session_does_not_advance() {
        let platform = InMemoryPlatform::with_session(session(5));
        let now = captured_at() + ChronoDuration::minutes(10);

        let snapshot = bridge(&platform).query_media_info_at(now).await.unwrap();
        let info = snapshot.info().unwrap();

        assert_eq!(info.status, PlaybackStatus::Paused);
        assert_eq!(info.position.to_string(), "00:01:30");
        assert_eq!(info.duration.to_string(), "00:06:53");
    }

    #[tokio::test]
    async fn test_query_unknown_status_code() {
        let platform = InMemoryPlatform::with_session(session(11));
        let snapshot = bridge(&platform).query_media_info_at(captured_at()).await.unwrap();

        assert_eq!(snapshot.info().unwrap().status, PlaybackStatus::Unknown(11));
    }

    #[tokio::test]
    async fn test_query_reads_fresh_state_every_call() {
        let platform = InMemoryPlatform::with_session(session(4));
        let bridge = bridge(&platform);

        assert!(bridge.query_media_info().await.unwrap().info().is_some());

        platform.set_session(None);
        assert_eq!(bridge.query_media_info().await.unwrap(), MediaSnapshot::not_found());
        assert_eq!(platform.manager_requests(), 2);
    }

    #[tokio::test]
    async fn test_query_platform_failure_propagates() {
        let platform = InMemoryPlatform::with_session(session(4));
        platform.set_failure(Some("RPC server unavailable"));

        let err = bridge(&platform).query_media_info().await.unwrap_err();
        assert!(matches!(err, BridgeError::Platform(_)));
        assert!(err.to_string().contains("RPC server unavailable"));
    }

    #[tokio::test]
    async fn test_command_without_session() {
        let platform = InMemoryPlatform::new();
        let result = bridge(&platform).send_command("play").await.unwrap();

        assert_eq!(result, CommandResult::not_found());
    }

    #[tokio::test]
    async fn test_command_is_case_insensitive() {
        let platform = InMemoryPlatform::with_session(session(5));
        let bridge = bridge(&platform);

        let upper = bridge.send_command("PLAY").await.unwrap();
        let lower = bridge.send_command("play").await.unwrap();

        assert_eq!(upper, lower);
        assert_eq!(upper, CommandResult::sent("play"));
        assert_eq!(platform.actions(), vec![TransportAction::Play, TransportAction::Play]);
    }

    #[tokio::test]
    async fn test_undefined_command_skips_platform() {
        let platform = InMemoryPlatform::with_session(session(4));
        let result = bridge(&platform).send_command("Shuffle").await.unwrap();

        assert_eq!(
            result,
            CommandResult::Failed {
                error: "'Shuffle' command undefined.".to_string()
            }
        );
        assert_eq!(platform.manager_requests(), 0);
        assert!(platform.actions().is_empty());
    }

    #[tokio::test]
    async fn test_undefined_command_without_session() {
        let platform = InMemoryPlatform::new();
        let result = bridge(&platform).send_command("shuffle").await.unwrap();

        assert_eq!(result, CommandResult::undefined("shuffle"));
        assert_eq!(platform.manager_requests(), 0);
    }

    #[tokio::test]
    async fn test_command_platform_failure_propagates() {
        let platform = InMemoryPlatform::with_session(session(5));
        platform.set_failure(Some("RPC server unavailable"));

        let err = bridge(&platform).send_command("play").await.unwrap_err();
        assert!(matches!(err, BridgeError::Platform(_)));
        assert!(err.to_string().contains("RPC server unavailable"));
        assert!(platform.actions().is_empty());
    }

    /// Hands out the current session, then breaks the platform
    struct DisconnectAfterLookup(InMemoryPlatform);

    struct DisconnectingManager {
        inner: Box<dyn SessionManager>,
        platform: InMemoryPlatform,
    }

    #[async_trait]
    impl MediaPlatform for DisconnectAfterLookup {
        async fn request_session_manager(&self) -> anyhow::Result<Box<dyn SessionManager>> {
            Ok(Box::new(DisconnectingManager {
                inner: self.0.request_session_manager().await?,
                platform: self.0.clone(),
            }))
        }
    }

    impl SessionManager for DisconnectingManager {
        fn current_session(&self) -> anyhow::Result<Option<Box<dyn Session>>> {
            let session = self.inner.current_session()?;
            self.platform.set_failure(Some("Session disconnected"));
            Ok(session)
        }
    }

    #[tokio::test]
    async fn test_transport_call_failure_propagates() {
        let platform = InMemoryPlatform::with_session(session(4));
        let bridge = MediaBridge::new(Arc::new(DisconnectAfterLookup(platform.clone())));

        let err = bridge.send_command("pause").await.unwrap_err();
        assert!(matches!(err, BridgeError::Platform(_)));
        assert!(err.to_string().contains("Session disconnected"));
        assert!(platform.actions().is_empty());
    }

    #[tokio::test]
    async fn test_commands_map_to_transport_actions() {
        let platform = InMemoryPlatform::with_session(session(4));
        let bridge = bridge(&platform);

        for token in ["pause", "next", "previous", "play"] {
            let result = bridge.send_command(token).await.unwrap();
            assert_eq!(result, CommandResult::Sent { status: format!("'{}' sent.", token) });
        }

        assert_eq!(
            platform.actions(),
            vec![
                TransportAction::Pause,
                TransportAction::SkipNext,
                TransportAction::SkipPrevious,
                TransportAction::Play,
            ]
        );
    }

    #[tokio::test]
    async fn test_repeated_pause_is_idempotent() {
        let platform = InMemoryPlatform::with_session(session(4));
        let bridge = bridge(&platform);

        let first = bridge.send_command("pause").await.unwrap();
        let second = bridge.send_command("pause").await.unwrap();

        assert_eq!(first, CommandResult::sent("pause"));
        assert_eq!(first, second);
    }

    struct StalledPlatform;

    #[async_trait]
    impl MediaPlatform for StalledPlatform {
        async fn request_session_manager(&self) -> anyhow::Result<Box<dyn SessionManager>> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_platform_timeout() {
        let config = BridgeConfig {
            platform_timeout: Some(Duration::from_secs(5)),
        };
        let bridge = MediaBridge::with_config(Arc::new(StalledPlatform), config);

        let err = bridge.query_media_info().await.unwrap_err();
        assert!(matches!(err, BridgeError::Timeout(limit) if limit == Duration::from_secs(5)));

        let err = bridge.send_command("next").await.unwrap_err();
        assert!(matches!(err, BridgeError::Timeout(_)));
    }
}
