//! Conversion of platform timestamps into UTC instants
//!
//! The platform counts time in 100ns ticks since 1601-01-01T00:00:00Z.

use chrono::{DateTime, Duration, Utc};

/// Number of 100ns ticks in one second
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Seconds between 1601-01-01 and 1970-01-01
const PLATFORM_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

/// 1601-01-01T00:00:00Z
pub fn platform_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH - Duration::seconds(PLATFORM_EPOCH_OFFSET_SECS)
}

/// Convert a platform tick count into a UTC instant
///
/// Sub-microsecond precision is truncated. Every `i64` tick count lands well
/// inside chrono's representable range (roughly +/- 29,000 years).
pub fn from_platform_ticks(ticks: i64) -> DateTime<Utc> {
    platform_epoch() + Duration::microseconds(ticks / 10)
}
