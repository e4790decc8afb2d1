use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Holiday {
    #[schema(example = 3)]
    pub id: u64,
    #[schema(example = "Independence Day")]
    pub name: String,
    #[schema(example = "2024-06-12", format = "date", value_type = String)]
    pub holiday_date: NaiveDate,
    /// Matches the same month and day in every year
    #[schema(example = true)]
    pub is_recurring: bool,
    #[schema(example = "2030-12-31", format = "date", value_type = Option<String>)]
    pub extended_until: Option<NaiveDate>,
    #[schema(example = 2.0)]
    pub default_multiplier: f64,
    #[schema(example = 2.6)]
    pub ot_multiplier: f64,
    #[schema(example = true)]
    pub apply_multiplier: bool,
}

impl Holiday {
    /// Multiplier used for a full day of attendance on this holiday.
    pub fn attendance_multiplier(&self) -> f64 {
        if self.default_multiplier > 0.0 {
            self.default_multiplier
        } else {
            1.0
        }
    }
}

/// `holidays` as read from MySQL. `extended_until` comes back as text so the
/// legacy `0000-00-00` sentinel can be told apart from a real date.
#[derive(Debug, sqlx::FromRow)]
pub struct HolidayRow {
    pub id: u64,
    pub holiday_name: String,
    pub holiday_date: NaiveDate,
    pub is_recurring: bool,
    pub extended_until: Option<String>,
    pub default_multiplier: f64,
    pub ot_multiplier: f64,
    pub apply_multiplier: bool,
}

impl From<HolidayRow> for Holiday {
    fn from(row: HolidayRow) -> Self {
        Self {
            id: row.id,
            name: row.holiday_name,
            holiday_date: row.holiday_date,
            is_recurring: row.is_recurring,
            extended_until: parse_extended_until(row.extended_until.as_deref()),
            default_multiplier: row.default_multiplier,
            ot_multiplier: row.ot_multiplier,
            apply_multiplier: row.apply_multiplier,
        }
    }
}

/// NULL, empty and the zero date all mean "no extension".
pub fn parse_extended_until(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() || raw.starts_with("0000-00-00") {
        return None;
    }
    NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d").ok()
}
