use chrono::NaiveDate;

use crate::engine::{CreditOutcome, LateDeductionTable, Punches, calculate_credit};
use crate::error::{HrisError, HrisResult};
use crate::model::attendance::AttendanceRecord;
use crate::model::shift::BreakWindow;
use crate::service::holiday::holiday_on;
use crate::state::AppState;

/// A validated "record attendance for employee E on date D" request.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceSubmission {
    pub attendance_date: NaiveDate,
    pub employee_id: u64,
    pub employee_name: String,
    pub punches: Punches,
}

#[derive(Debug, Clone)]
pub struct RecordedCredit {
    pub outcome: CreditOutcome,
    pub breaks: Vec<BreakWindow>,
}

/// Credits one day of attendance and stores it.
///
/// Without an assigned shift nothing is computed or written.
pub async fn record_attendance(
    state: &AppState,
    submission: AttendanceSubmission,
) -> HrisResult<RecordedCredit> {
    let employee_id = submission.employee_id;
    let date = submission.attendance_date;

    let schedule = state
        .shifts
        .shift_for(employee_id, date)
        .await?
        .ok_or(HrisError::NoShiftAssigned { employee_id, date })?;

    let late_rules = LateDeductionTable::new(state.late_rules.late_rules().await?);
    let holiday = holiday_on(state.holidays.as_ref(), date).await?;

    let outcome = calculate_credit(&submission.punches, &schedule, holiday.as_ref(), &late_rules);

    let record = AttendanceRecord {
        attendance_date: date,
        employee_id,
        employee_name: submission.employee_name,
        work_time_id: schedule.shift.id,
        time_in_morning: submission.punches.time_in_morning,
        time_out_morning: submission.punches.time_out_morning,
        time_in_afternoon: submission.punches.time_in_afternoon,
        time_out_afternoon: submission.punches.time_out_afternoon,
        days_credited: outcome.days_credited,
        is_holiday_attendance: outcome.is_holiday_attendance,
        overtime_request: None,
    };
    state.attendance.save_credit(&record).await?;

    tracing::info!(
        employee_id,
        %date,
        days_credited = outcome.days_credited,
        total_minutes = outcome.total_minutes,
        holiday = outcome.is_holiday_attendance,
        "Attendance credited"
    );

    Ok(RecordedCredit {
        outcome,
        breaks: schedule.breaks,
    })
}
