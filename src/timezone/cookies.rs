use serde::Serialize;

use super::DEFAULT_TIMEZONE;

const TIMEZONE_COOKIE: &str = "timezone";

/// A zone offered in the visitor's timezone picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimezoneOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const COMMON_TIMEZONES: [TimezoneOption; 8] = [
    TimezoneOption { value: "Asia/Seoul", label: "Korea (KST, UTC+9)" },
    TimezoneOption { value: "Asia/Tokyo", label: "Japan (JST, UTC+9)" },
    TimezoneOption { value: "Asia/Shanghai", label: "China (CST, UTC+8)" },
    TimezoneOption { value: "Europe/London", label: "United Kingdom (GMT/BST)" },
    TimezoneOption { value: "Europe/Paris", label: "France (CET/CEST)" },
    TimezoneOption { value: "Europe/Berlin", label: "Germany (CET/CEST)" },
    TimezoneOption { value: "America/New_York", label: "US Eastern (EST/EDT)" },
    TimezoneOption { value: "America/Los_Angeles", label: "US Pacific (PST/PDT)" },
];

/// The `timezone` cookie from a raw `Cookie` header, if set and non-empty.
/// A value containing `=` is cut at the first `=`.
pub fn cookie_timezone(cookie_header: Option<&str>) -> Option<&str> {
    cookie_header?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TIMEZONE_COOKIE)
        .map(|(_, value)| value.split('=').next().unwrap_or_default().trim())
        .filter(|value| !value.is_empty())
}

/// Like [`cookie_timezone`] but falls back to [`DEFAULT_TIMEZONE`]
pub fn timezone_from_cookies(cookie_header: Option<&str>) -> String {
    cookie_timezone(cookie_header)
        .unwrap_or(DEFAULT_TIMEZONE)
        .to_string()
}
