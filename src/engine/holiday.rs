//! Holiday matching and tie-breaking.

use chrono::{Datelike, NaiveDate};

use crate::model::holiday::Holiday;

/// Whether `holiday` is in force on `date`.
///
/// A holiday matches on its exact date, or on the same month and day of any
/// year when it is recurring. Either way `extended_until`, when set, caps the
/// last date it can match.
pub fn holiday_applies(holiday: &Holiday, date: NaiveDate) -> bool {
    let same_day = holiday.holiday_date == date;
    let recurring_day = holiday.is_recurring
        && holiday.holiday_date.month() == date.month()
        && holiday.holiday_date.day() == date.day();

    (same_day || recurring_day) && holiday.extended_until.is_none_or(|until| until >= date)
}

/// Picks the one holiday in force on `date`, if any.
///
/// When several rows match, an exact-date match beats a recurring
/// month-day match, and the lowest id breaks any remaining tie.
pub fn resolve_holiday(candidates: &[Holiday], date: NaiveDate) -> Option<&Holiday> {
    candidates
        .iter()
        .filter(|h| holiday_applies(h, date))
        .min_by_key(|h| (h.holiday_date != date, h.id))
}
