//! Playback position estimation
//!
//! The platform only refreshes the reported position on state changes (seek,
//! pause, track change), so while a track is playing the position has to be
//! extrapolated from the time the sample was captured.

use chrono::{DateTime, Utc};

use crate::models::{ClockTime, PlaybackStatus, TimelineSample};
use crate::time::TICKS_PER_SECOND;

/// Whole seconds in a tick count (truncating)
pub fn ticks_to_secs(ticks: i64) -> i64 {
    ticks / TICKS_PER_SECOND
}

/// Whole seconds between two instants, rounded towards negative infinity
fn floor_elapsed_secs(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed = now.signed_duration_since(since);
    let secs = elapsed.num_seconds();
    if elapsed.subsec_nanos() < 0 {
        secs - 1
    } else {
        secs
    }
}

/// Estimate the playback position in whole seconds
///
/// Only a `Playing` session advances. A sample captured "in the future"
/// (clock skew) yields a negative elapsed term that is applied unclamped.
pub fn estimate_position(
    reported_position_ticks: i64,
    last_updated: DateTime<Utc>,
    now: DateTime<Utc>,
    status: PlaybackStatus,
) -> ClockTime {
    let base = ticks_to_secs(reported_position_ticks);
    if status.is_playing() {
        ClockTime::from_secs(base + floor_elapsed_secs(last_updated, now))
    } else {
        ClockTime::from_secs(base)
    }
}

/// Track length in whole seconds
pub fn track_duration(end_position_ticks: i64) -> ClockTime {
    ClockTime::from_secs(ticks_to_secs(end_position_ticks))
}

impl TimelineSample {
    pub fn position_at(&self, now: DateTime<Utc>, status: PlaybackStatus) -> ClockTime {
        estimate_position(self.reported_position_ticks, self.last_updated, now, status)
    }

    pub fn duration(&self) -> ClockTime {
        track_duration(self.end_position_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn captured_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    const NINETY_SECONDS: i64 = 90 * TICKS_PER_SECOND;

    #[test]
    fn test_non_playing_status_ignores_clock() {
        let later = captured_at() + Duration::hours(3);
        for status in [
            PlaybackStatus::Closed,
            PlaybackStatus::Opened,
            PlaybackStatus::Changing,
            PlaybackStatus::Stopped,
            PlaybackStatus::Paused,
            PlaybackStatus::Unknown(42),
        ] {
            let position = estimate_position(NINETY_SECONDS, captured_at(), later, status);
            assert_eq!(position.as_secs(), 90);
            let position = estimate_position(NINETY_SECONDS, captured_at(), captured_at(), status);
            assert_eq!(position.as_secs(), 90);
        }
    }

    #[test]
    fn test_playing_adds_elapsed_seconds() {
        let now = captured_at() + Duration::seconds(5);
        let position =
            estimate_position(NINETY_SECONDS, captured_at(), now, PlaybackStatus::Playing);
        assert_eq!(position.as_secs(), 95);
    }

    #[test]
    fn test_partial_seconds_are_floored() {
        let now = captured_at() + Duration::milliseconds(5_999);
        let position =
            estimate_position(NINETY_SECONDS, captured_at(), now, PlaybackStatus::Playing);
        assert_eq!(position.as_secs(), 95);
    }

    #[test]
    fn test_base_position_truncates_ticks() {
        let ticks = NINETY_SECONDS + TICKS_PER_SECOND - 1;
        let position =
            estimate_position(ticks, captured_at(), captured_at(), PlaybackStatus::Paused);
        assert_eq!(position.as_secs(), 90);
    }

    #[test]
    fn test_clock_skew_is_not_clamped() {
        let now = captured_at() - Duration::milliseconds(2_500);
        let position =
            estimate_position(NINETY_SECONDS, captured_at(), now, PlaybackStatus::Playing);
        assert_eq!(position.as_secs(), 87);

        let position = estimate_position(0, captured_at(), now, PlaybackStatus::Playing);
        assert_eq!(position.as_secs(), -3);
    }

    #[test]
    fn test_position_is_monotonic_while_playing() {
        let mut previous = i64::MIN;
        for millis in (0..10_000).step_by(250) {
            let now = captured_at() + Duration::milliseconds(millis);
            let current =
                estimate_position(NINETY_SECONDS, captured_at(), now, PlaybackStatus::Playing)
                    .as_secs();
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_duration_ignores_elapsed_time() {
        let sample = TimelineSample {
            reported_position_ticks: NINETY_SECONDS,
            last_updated: captured_at(),
            end_position_ticks: 413 * TICKS_PER_SECOND + 9_999_999,
        };

        assert_eq!(sample.duration().as_secs(), 413);
        assert_eq!(
            sample
                .position_at(captured_at() + Duration::seconds(10), PlaybackStatus::Playing)
                .as_secs(),
            100
        );
    }
}
