use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use super::{offset::timezone_offset_minutes, TimeRangeError};

/// UTC interval covering one calendar day. Both ends are inclusive: `end` is
/// the last millisecond of the day, so queries must compare with `<=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayRange {
    fn starting_at(start: DateTime<Utc>) -> Option<Self> {
        let end = start
            .checked_add_signed(Duration::days(1))?
            .checked_sub_signed(Duration::milliseconds(1))?;
        Some(Self { start, end })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UtcDayRange {
    #[serde(flatten)]
    pub range: DayRange,
    pub date_used: NaiveDate,
}

/// Strict `YYYY-MM-DD`; chrono's `%Y` alone would take signed, extended years
fn parse_calendar_date(date: &str) -> Result<NaiveDate, TimeRangeError> {
    let invalid = || TimeRangeError::InvalidDate(date.to_string());
    let trimmed = date.trim();
    let bytes = trimmed.as_bytes();

    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())
}

fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// The UTC calendar day named by `date`, or today's UTC date when `date` is
/// `None`. A malformed date is an error; it is never coerced to today.
pub fn utc_day_range(date: Option<&str>) -> Result<UtcDayRange, TimeRangeError> {
    utc_day_range_at(date, Utc::now())
}

pub fn utc_day_range_at(
    date: Option<&str>,
    now: DateTime<Utc>,
) -> Result<UtcDayRange, TimeRangeError> {
    let date_used = match date {
        Some(date) => parse_calendar_date(date)?,
        None => now.date_naive(),
    };

    let range = DayRange::starting_at(utc_midnight(date_used))
        .ok_or_else(|| TimeRangeError::InvalidDate(date_used.to_string()))?;

    Ok(UtcDayRange { range, date_used })
}

fn zoned_day_range(date: NaiveDate, timezone: &str) -> Result<DayRange, TimeRangeError> {
    let midnight = utc_midnight(date);
    // offset as of this date, not as of today
    let offset = timezone_offset_minutes(timezone, midnight);
    midnight
        .checked_sub_signed(Duration::minutes(offset as i64))
        .and_then(DayRange::starting_at)
        .ok_or_else(|| TimeRangeError::InvalidDate(date.to_string()))
}

/// UTC bounds of the calendar day `date` as observed in `timezone`.
///
/// The date is required here. An unknown timezone is not an error; it uses
/// the default offset like [`timezone_offset_minutes`].
pub fn day_range_in_timezone(date: &str, timezone: &str) -> Result<DayRange, TimeRangeError> {
    let date = parse_calendar_date(date)?;
    zoned_day_range(date, timezone)
}

pub fn today_range_in_timezone(timezone: &str) -> Result<DayRange, TimeRangeError> {
    today_range_in_timezone_at(timezone, Utc::now())
}

pub fn today_range_in_timezone_at(
    timezone: &str,
    now: DateTime<Utc>,
) -> Result<DayRange, TimeRangeError> {
    let offset = timezone_offset_minutes(timezone, now);
    let local_today = now
        .checked_add_signed(Duration::minutes(offset as i64))
        .ok_or_else(|| TimeRangeError::InvalidDate(now.to_rfc3339()))?
        .date_naive();
    zoned_day_range(local_today, timezone)
}
