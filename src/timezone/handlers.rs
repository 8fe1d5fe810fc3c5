use axum::{
    extract::{Query, State},
    http::{header::COOKIE, HeaderMap},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{
    cookie_timezone, day_range_in_timezone, today_range_in_timezone, utc_day_range, DayRange,
    TimezoneOption, COMMON_TIMEZONES,
};
use crate::shared::{AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct DayRangeQuery {
    pub date: Option<String>,
    pub tz: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TodayRangeQuery {
    pub tz: Option<String>,
}

/// Inclusive UTC bounds for a requested day
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRangeResponse {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_used: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl DayRangeResponse {
    fn zoned(range: DayRange, timezone: &str) -> Self {
        Self {
            start: range.start,
            end: range.end,
            date_used: None,
            timezone: Some(timezone.to_string()),
        }
    }
}

fn request_timezone<'a>(tz: Option<&'a str>, headers: &'a HeaderMap) -> Option<&'a str> {
    tz.filter(|tz| !tz.is_empty()).or_else(|| {
        let header = headers.get(COOKIE).and_then(|value| value.to_str().ok());
        cookie_timezone(header)
    })
}

/// GET /day-range?date=YYYY-MM-DD&tz=Zone
///
/// With a zone (query or `timezone` cookie) the date is a local day in that
/// zone; without one it's a UTC calendar day.
#[instrument(name = "day_range", skip(headers))]
pub async fn day_range(
    Query(query): Query<DayRangeQuery>,
    headers: HeaderMap,
) -> Result<Json<DayRangeResponse>, AppError> {
    let date = query.date.as_deref();

    let response = match request_timezone(query.tz.as_deref(), &headers) {
        Some(timezone) => {
            let range = match date {
                Some(date) => day_range_in_timezone(date, timezone)?,
                None => today_range_in_timezone(timezone)?,
            };
            DayRangeResponse::zoned(range, timezone)
        }
        None => {
            let utc = utc_day_range(date)?;
            DayRangeResponse {
                start: utc.range.start,
                end: utc.range.end,
                date_used: Some(utc.date_used),
                timezone: None,
            }
        }
    };

    debug!(start = %response.start, end = %response.end, "Resolved day range");
    Ok(Json(response))
}

/// GET /today-range?tz=Zone
#[instrument(name = "today_range", skip(state, headers))]
pub async fn today_range(
    State(state): State<AppState>,
    Query(query): Query<TodayRangeQuery>,
    headers: HeaderMap,
) -> Result<Json<DayRangeResponse>, AppError> {
    let timezone =
        request_timezone(query.tz.as_deref(), &headers).unwrap_or(state.default_timezone.as_str());

    let range = today_range_in_timezone(timezone)?;
    Ok(Json(DayRangeResponse::zoned(range, timezone)))
}

/// GET /timezones
pub async fn list_timezones() -> Json<[TimezoneOption; 8]> {
    Json(COMMON_TIMEZONES)
}
