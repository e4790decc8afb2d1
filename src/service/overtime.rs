use chrono::NaiveDate;

use crate::engine::{computed_overtime, overtime_multiplier};
use crate::error::{HrisError, HrisResult};
use crate::service::holiday::holiday_on;
use crate::state::AppState;

/// An approved overtime request, as handed over by the approval flow.
#[derive(Debug, Clone, PartialEq)]
pub struct OvertimeApproval {
    pub employee_id: u64,
    pub date_requested: NaiveDate,
    pub hours_requested: f64,
    /// Already resolved by the caller; resolved here from the holiday calendar when absent
    pub multiplier_used: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OvertimeOutcome {
    pub multiplier_used: f64,
    pub computed_overtime: f64,
}

/// Overtime multiplier for `date` from the holiday calendar.
pub async fn multiplier_for(state: &AppState, date: NaiveDate) -> HrisResult<f64> {
    let holiday = holiday_on(state.holidays.as_ref(), date).await?;
    Ok(overtime_multiplier(holiday.as_ref()))
}

/// Stamps `computed_overtime` on the matching attendance row. Re-approving
/// writes the same value again; the day credit is not recomputed.
pub async fn approve_overtime(state: &AppState, approval: OvertimeApproval) -> HrisResult<OvertimeOutcome> {
    if approval.hours_requested.is_nan() || approval.hours_requested < 0.0 {
        return Err(HrisError::Validation(
            "hours_requested must be zero or more".to_string(),
        ));
    }

    let multiplier_used = match approval.multiplier_used {
        Some(m) if m > 0.0 => m,
        Some(_) => {
            return Err(HrisError::Validation(
                "multiplier_used must be greater than zero".to_string(),
            ));
        }
        None => multiplier_for(state, approval.date_requested).await?,
    };

    let computed = computed_overtime(approval.hours_requested, multiplier_used);
    let updated = state
        .attendance
        .set_overtime(approval.employee_id, approval.date_requested, computed)
        .await?;

    if !updated {
        return Err(HrisError::NotFound(format!(
            "No attendance record for employee {} on {}",
            approval.employee_id, approval.date_requested
        )));
    }

    tracing::info!(
        employee_id = approval.employee_id,
        date = %approval.date_requested,
        multiplier_used,
        computed_overtime = computed,
        "Overtime recorded"
    );

    Ok(OvertimeOutcome {
        multiplier_used,
        computed_overtime: computed,
    })
}
