use chrono::{DateTime, Utc};
use mediabridge_media_session::TimelineProperties;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::time::from_platform_ticks;

/// Message returned whenever there is no current media session
pub const MEDIA_NOT_FOUND: &str = "Media not found.";

/// Transport status of a media session
///
/// Raw platform codes outside the known range are kept in `Unknown` so newer
/// platform states are still reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackStatus {
    Closed,
    Opened,
    Changing,
    Stopped,
    Playing,
    Paused,
    Unknown(i32),
}

impl PlaybackStatus {
    /// The raw platform code for this status
    pub fn code(&self) -> i32 {
        match self {
            PlaybackStatus::Closed => 0,
            PlaybackStatus::Opened => 1,
            PlaybackStatus::Changing => 2,
            PlaybackStatus::Stopped => 3,
            PlaybackStatus::Playing => 4,
            PlaybackStatus::Paused => 5,
            PlaybackStatus::Unknown(code) => *code,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackStatus::Playing)
    }
}

impl From<i32> for PlaybackStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => PlaybackStatus::Closed,
            1 => PlaybackStatus::Opened,
            2 => PlaybackStatus::Changing,
            3 => PlaybackStatus::Stopped,
            4 => PlaybackStatus::Playing,
            5 => PlaybackStatus::Paused,
            other => PlaybackStatus::Unknown(other),
        }
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackStatus::Closed => f.write_str("Closed"),
            PlaybackStatus::Opened => f.write_str("Opened"),
            PlaybackStatus::Changing => f.write_str("Changing"),
            PlaybackStatus::Stopped => f.write_str("Stopped"),
            PlaybackStatus::Playing => f.write_str("Playing"),
            PlaybackStatus::Paused => f.write_str("Paused"),
            PlaybackStatus::Unknown(code) => write!(f, "Unknown({})", code),
        }
    }
}

/// Error type for invalid playback status strings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseStatusError;

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid playback status value")
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for PlaybackStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Closed" => Ok(PlaybackStatus::Closed),
            "Opened" => Ok(PlaybackStatus::Opened),
            "Changing" => Ok(PlaybackStatus::Changing),
            "Stopped" => Ok(PlaybackStatus::Stopped),
            "Playing" => Ok(PlaybackStatus::Playing),
            "Paused" => Ok(PlaybackStatus::Paused),
            _ => s
                .strip_prefix("Unknown(")
                .and_then(|rest| rest.strip_suffix(')'))
                .and_then(|code| code.parse().ok())
                .map(PlaybackStatus::Unknown)
                .ok_or(ParseStatusError),
        }
    }
}

impl Serialize for PlaybackStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PlaybackStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A whole number of seconds, shown as `HH:MM:SS`
///
/// Hours are unbounded and padded to at least two digits. Negative values
/// get a leading `-`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(i64);

impl ClockTime {
    pub const ZERO: ClockTime = ClockTime(0);

    pub fn from_secs(seconds: i64) -> Self {
        Self(seconds)
    }

    pub fn as_secs(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let total = self.0.unsigned_abs();
        write!(
            f,
            "{}{:02}:{:02}:{:02}",
            sign,
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}

/// Error type for invalid `HH:MM:SS` strings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseClockTimeError;

impl fmt::Display for ParseClockTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid HH:MM:SS value")
    }
}

impl std::error::Error for ParseClockTimeError {}

impl FromStr for ClockTime {
    type Err = ParseClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let mut parts = body.split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseClockTimeError);
        };
        if h.len() < 2 || m.len() != 2 || sec.len() != 2 {
            return Err(ParseClockTimeError);
        }

        let hours: i64 = h.parse().map_err(|_| ParseClockTimeError)?;
        let minutes: i64 = m.parse().map_err(|_| ParseClockTimeError)?;
        let seconds: i64 = sec.parse().map_err(|_| ParseClockTimeError)?;
        if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
            return Err(ParseClockTimeError);
        }

        let total = hours
            .checked_mul(3600)
            .and_then(|t| t.checked_add(minutes * 60 + seconds))
            .ok_or(ParseClockTimeError)?;
        Ok(ClockTime(if negative { -total } else { total }))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Timeline of the current session, with the capture time resolved to UTC
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineSample {
    pub reported_position_ticks: i64,
    pub last_updated: DateTime<Utc>,
    pub end_position_ticks: i64,
}

impl From<TimelineProperties> for TimelineSample {
    fn from(props: TimelineProperties) -> Self {
        Self {
            reported_position_ticks: props.position_ticks,
            last_updated: from_platform_ticks(props.last_updated_ticks),
            end_position_ticks: props.end_time_ticks,
        }
    }
}

/// What is playing right now
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub title: String,
    pub artist: String,
    pub status: PlaybackStatus,
    pub position: ClockTime,
    pub duration: ClockTime,
}

/// Result of a media query
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaSnapshot {
    Active(MediaInfo),
    Absent { error: String },
}

impl MediaSnapshot {
    /// The snapshot reported when no session exists
    pub fn not_found() -> Self {
        MediaSnapshot::Absent {
            error: MEDIA_NOT_FOUND.to_string(),
        }
    }

    pub fn info(&self) -> Option<&MediaInfo> {
        match self {
            MediaSnapshot::Active(info) => Some(info),
            MediaSnapshot::Absent { .. } => None,
        }
    }
}

/// Result of a transport command
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandResult {
    Sent { status: String },
    Failed { error: String },
}

impl CommandResult {
    pub fn sent(command: &str) -> Self {
        CommandResult::Sent {
            status: format!("'{}' sent.", command),
        }
    }

    pub fn undefined(token: &str) -> Self {
        CommandResult::Failed {
            error: format!("'{}' command undefined.", token),
        }
    }

    pub fn not_found() -> Self {
        CommandResult::Failed {
            error: MEDIA_NOT_FOUND.to_string(),
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, CommandResult::Sent { .. })
    }
}
