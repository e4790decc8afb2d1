use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A work schedule row from `work_times`. Reference data, never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Shift {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "09:00:00", value_type = String)]
    pub start_time: NaiveTime,
    #[schema(example = "18:00:00", value_type = String)]
    pub end_time: NaiveTime,
    /// Paid minutes before break subtraction
    #[schema(example = 540)]
    pub total_minutes: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct BreakWindow {
    #[schema(example = 1)]
    pub id: u64,
    #[sqlx(rename = "work_time_id")]
    #[schema(example = 1)]
    pub shift_id: u64,
    #[schema(example = "12:00:00", value_type = String)]
    pub break_start: NaiveTime,
    #[schema(example = "13:00:00", value_type = String)]
    pub break_end: NaiveTime,
    #[schema(example = 60)]
    pub break_minutes: i32,
}

/// A shift together with all of its break windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftSchedule {
    pub shift: Shift,
    pub breaks: Vec<BreakWindow>,
}

impl ShiftSchedule {
    /// Paid minutes of a full day net of breaks; the denominator of the day credit.
    pub fn credit_basis_minutes(&self) -> f64 {
        let break_minutes: i32 = self.breaks.iter().map(|b| b.break_minutes).sum();
        f64::from(self.shift.total_minutes - break_minutes)
    }
}

/// Row of `employee_work_schedules`: which shift an employee works from a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeeSchedule {
    pub id: u64,
    pub employee_id: u64,
    pub work_time_id: u64,
    pub effective_from: NaiveDate,
    pub effective_until: Option<NaiveDate>,
}

impl EmployeeSchedule {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_until.is_none_or(|until| until >= date)
    }
}
