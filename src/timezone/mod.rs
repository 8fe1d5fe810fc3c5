// Public API - what other modules can use
pub use cookies::{cookie_timezone, timezone_from_cookies, TimezoneOption, COMMON_TIMEZONES};
pub use errors::TimeRangeError;
pub use handlers::{day_range, list_timezones, today_range};
pub use offset::{timezone_offset_minutes, DEFAULT_OFFSET_MINUTES};
pub use range::{
    day_range_in_timezone, today_range_in_timezone, today_range_in_timezone_at, utc_day_range,
    utc_day_range_at, DayRange, UtcDayRange,
};

/// Zone assumed for visitors that never reported one
pub const DEFAULT_TIMEZONE: &str = "Asia/Seoul";

// Internal modules
mod cookies;
mod errors;
mod handlers;
mod offset;
mod range;
