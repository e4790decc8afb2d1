use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{HrisError, HrisResult};

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses a `YYYY-MM-DD` field. Missing or blank is a validation error.
pub fn parse_required_date(field: &str, raw: Option<&str>) -> HrisResult<NaiveDate> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| HrisError::Validation(format!("{field} is required")))?;

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| HrisError::Validation(format!("{field} must be a date in YYYY-MM-DD format")))
}

/// Parses a punch time. Accepts `HH:MM[:SS]` or a full timestamp, whose date
/// part is ignored. Missing or blank means no punch.
pub fn parse_punch(field: &str, raw: Option<&str>) -> HrisResult<Option<NaiveTime>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Some(time) = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
    {
        return Ok(Some(time));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| Some(dt.time()))
        .ok_or_else(|| HrisError::Validation(format!("{field} is not a valid time: {raw}")))
}
