use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Offset returned for zones the tz database doesn't know (UTC+9)
pub const DEFAULT_OFFSET_MINUTES: i32 = 540;

/// Signed offset of `timezone` from UTC, in minutes, at the given instant.
///
/// Positive means local time is ahead of UTC (`Asia/Seoul` is +540). The
/// offset is resolved for `at` itself, so zones with daylight saving yield
/// different values across the year. Unknown zone names never fail: they
/// resolve to [`DEFAULT_OFFSET_MINUTES`].
pub fn timezone_offset_minutes(timezone: &str, at: DateTime<Utc>) -> i32 {
    match timezone.parse::<Tz>() {
        Ok(tz) => {
            tz.offset_from_utc_datetime(&at.naive_utc())
                .fix()
                .local_minus_utc()
                / 60
        }
        Err(_) => {
            warn!(
                timezone = %timezone,
                fallback_minutes = DEFAULT_OFFSET_MINUTES,
                "Unknown timezone, using default offset"
            );
            DEFAULT_OFFSET_MINUTES
        }
    }
}
