//! In-memory media platform
//!
//! Used on targets without a supported media framework (it simply never has a
//! session) and as a scriptable stand-in for a real platform in tests. Every
//! handle shares the same state, so changes made through [`InMemoryPlatform`]
//! are visible to sessions that were handed out earlier, just like a live OS
//! session.

use crate::{
    MediaPlatform, MediaProperties, PlaybackInfo, Session, SessionManager, TimelineProperties,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// SMTC status codes used when a transport command changes the state
const STATUS_PLAYING: i32 = 4;
const STATUS_PAUSED: i32 = 5;

/// Transport action received by an in-memory session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportAction {
    Play,
    Pause,
    SkipNext,
    SkipPrevious,
}

/// Everything a session reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub properties: MediaProperties,
    pub timeline: TimelineProperties,
    pub playback: PlaybackInfo,
}

#[derive(Debug, Default)]
struct PlatformState {
    session: Option<SessionState>,
    failure: Option<String>,
    manager_requests: usize,
    actions: Vec<TransportAction>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPlatform {
    state: Arc<Mutex<PlatformState>>,
}

impl InMemoryPlatform {
    /// A platform with no current session
    pub fn new() -> Self {
        Self::default()
    }

    /// A platform whose current session reports `session`
    pub fn with_session(session: SessionState) -> Self {
        let platform = Self::new();
        platform.set_session(Some(session));
        platform
    }

    /// Replace (or remove) the current session
    pub fn set_session(&self, session: Option<SessionState>) {
        self.lock().session = session;
    }

    /// Make every platform call fail with `message`; `None` clears the failure
    pub fn set_failure(&self, message: Option<&str>) {
        self.lock().failure = message.map(str::to_string);
    }

    /// Number of times a session manager was requested
    pub fn manager_requests(&self) -> usize {
        self.lock().manager_requests
    }

    /// Transport actions received so far, oldest first
    pub fn actions(&self) -> Vec<TransportAction> {
        self.lock().actions.clone()
    }

    fn lock(&self) -> MutexGuard<'_, PlatformState> {
        lock(&self.state)
    }
}

fn lock(state: &Mutex<PlatformState>) -> MutexGuard<'_, PlatformState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn check_failure(state: &PlatformState) -> Result<()> {
    match &state.failure {
        Some(message) => Err(anyhow!("{}", message)),
        None => Ok(()),
    }
}

#[async_trait]
impl MediaPlatform for InMemoryPlatform {
    async fn request_session_manager(&self) -> Result<Box<dyn SessionManager>> {
        let mut state = self.lock();
        state.manager_requests += 1;
        check_failure(&state)?;

        Ok(Box::new(InMemoryManager {
            state: self.state.clone(),
        }))
    }
}

struct InMemoryManager {
    state: Arc<Mutex<PlatformState>>,
}

impl SessionManager for InMemoryManager {
    fn current_session(&self) -> Result<Option<Box<dyn Session>>> {
        let state = lock(&self.state);
        check_failure(&state)?;

        if state.session.is_none() {
            return Ok(None);
        }

        Ok(Some(Box::new(InMemorySession {
            state: self.state.clone(),
        })))
    }
}

struct InMemorySession {
    state: Arc<Mutex<PlatformState>>,
}

impl InMemorySession {
    fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> Result<T> {
        let state = lock(&self.state);
        check_failure(&state)?;

        state
            .session
            .as_ref()
            .map(f)
            .ok_or_else(|| anyhow!("Session closed"))
    }

    fn send(&self, action: TransportAction) -> Result<bool> {
        let mut state = lock(&self.state);
        check_failure(&state)?;

        let Some(session) = state.session.as_mut() else {
            return Ok(false);
        };
        match action {
            TransportAction::Play => session.playback.playback_status = STATUS_PLAYING,
            TransportAction::Pause => session.playback.playback_status = STATUS_PAUSED,
            TransportAction::SkipNext | TransportAction::SkipPrevious => {}
        }

        debug!("In-memory session received {:?}", action);
        state.actions.push(action);
        Ok(true)
    }
}

#[async_trait]
impl Session for InMemorySession {
    async fn media_properties(&self) -> Result<MediaProperties> {
        self.read(|s| s.properties.clone())
    }

    fn timeline_properties(&self) -> Result<TimelineProperties> {
        self.read(|s| s.timeline)
    }

    fn playback_info(&self) -> Result<PlaybackInfo> {
        self.read(|s| s.playback)
    }

    async fn play(&self) -> Result<bool> {
        self.send(TransportAction::Play)
    }

    async fn pause(&self) -> Result<bool> {
        self.send(TransportAction::Pause)
    }

    async fn skip_next(&self) -> Result<bool> {
        self.send(TransportAction::SkipNext)
    }

    async fn skip_previous(&self) -> Result<bool> {
        self.send(TransportAction::SkipPrevious)
    }
}
