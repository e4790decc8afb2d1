use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of `attendance_records`, unique per (employee_id, attendance_date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = "2025-06-12", format = "date", value_type = String)]
    pub attendance_date: NaiveDate,
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "Jane Cruz")]
    pub employee_name: String,
    #[schema(example = 1)]
    pub work_time_id: u64,
    #[schema(example = "09:00:00", value_type = Option<String>)]
    pub time_in_morning: Option<NaiveTime>,
    #[schema(example = "12:00:00", value_type = Option<String>)]
    pub time_out_morning: Option<NaiveTime>,
    #[schema(example = "13:00:00", value_type = Option<String>)]
    pub time_in_afternoon: Option<NaiveTime>,
    #[schema(example = "18:00:00", value_type = Option<String>)]
    pub time_out_afternoon: Option<NaiveTime>,
    #[schema(example = 1.0)]
    pub days_credited: f64,
    #[schema(example = false)]
    pub is_holiday_attendance: bool,
    /// Written later by overtime approval
    #[schema(example = 2.5, nullable = true)]
    pub overtime_request: Option<f64>,
}
