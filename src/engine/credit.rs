//! Day-credit calculation for one employee on one date.
//!
//! The calculation is a straight pipeline with no hidden state:
//!
//! 1. credit basis = shift minutes minus every break's minutes
//! 2. per session (morning, afternoon): overlap with the shift window minus
//!    overlap with each break, floored at zero
//! 3. ratio of worked minutes to the credit basis
//! 4. late deductions subtracted from the ratio (not from minutes)
//! 5. clamp to `[0, 1]`
//! 6. holiday multiplier, only on a full-credit day
//!
//! Rounding happens only in step 6 or when producing the final value.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::engine::late::LateDeductionPolicy;
use crate::engine::overlap::overlap_minutes;
use crate::engine::round_to;
use crate::model::holiday::Holiday;
use crate::model::shift::ShiftSchedule;

/// Afternoon punches after this time count as late.
pub fn afternoon_reference() -> NaiveTime {
    NaiveTime::from_hms_opt(13, 0, 0).unwrap_or_default()
}

/// The four raw punches of a day. A session only counts when both of its punches are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Punches {
    pub time_in_morning: Option<NaiveTime>,
    pub time_out_morning: Option<NaiveTime>,
    pub time_in_afternoon: Option<NaiveTime>,
    pub time_out_afternoon: Option<NaiveTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreditOutcome {
    pub days_credited: f64,
    pub total_minutes: f64,
    pub credit_basis_minutes: f64,
    /// Sum of morning and afternoon late deductions
    pub late_deduction: f64,
    /// Ratio after deduction and clamp, before any holiday multiplier
    pub adjusted_days: f64,
    /// A holiday is in force on the date
    pub is_holiday_attendance: bool,
    /// Set when the holiday multiplier was actually applied
    pub multiplier_applied: Option<f64>,
}

/// Break-adjusted minutes of one punch pair against the shift. Never negative.
pub fn session_minutes(
    punch_in: NaiveTime,
    punch_out: NaiveTime,
    schedule: &ShiftSchedule,
) -> f64 {
    let shift = &schedule.shift;
    let in_shift = overlap_minutes(punch_in, punch_out, shift.start_time, shift.end_time);
    let in_breaks: f64 = schedule
        .breaks
        .iter()
        .map(|b| overlap_minutes(punch_in, punch_out, b.break_start, b.break_end))
        .sum();

    (in_shift - in_breaks).max(0.0)
}

pub fn calculate_credit(
    punches: &Punches,
    schedule: &ShiftSchedule,
    holiday: Option<&Holiday>,
    late_policy: &dyn LateDeductionPolicy,
) -> CreditOutcome {
    let credit_basis_minutes = schedule.credit_basis_minutes();

    let mut total_minutes = 0.0;
    if let (Some(punch_in), Some(punch_out)) = (punches.time_in_morning, punches.time_out_morning) {
        total_minutes += session_minutes(punch_in, punch_out, schedule);
    }
    if let (Some(punch_in), Some(punch_out)) =
        (punches.time_in_afternoon, punches.time_out_afternoon)
    {
        total_minutes += session_minutes(punch_in, punch_out, schedule);
    }

    let mut adjusted_days = if total_minutes > 0.0 && credit_basis_minutes > 0.0 {
        total_minutes / credit_basis_minutes
    } else {
        0.0
    };

    let mut late_deduction = 0.0;
    if let Some(time_in) = punches.time_in_morning {
        if time_in > schedule.shift.start_time {
            late_deduction += late_policy.deduction_for(time_in);
        }
    }
    if let Some(time_in) = punches.time_in_afternoon {
        if time_in > afternoon_reference() {
            late_deduction += late_policy.deduction_for(time_in);
        }
    }

    adjusted_days = (adjusted_days - late_deduction).clamp(0.0, 1.0);

    let full_day = round_to(adjusted_days, 2) == 1.0;
    let multiplier_applied = holiday
        .filter(|h| h.apply_multiplier && full_day)
        .map(Holiday::attendance_multiplier);

    let days_credited = match multiplier_applied {
        Some(multiplier) => round_to(adjusted_days * multiplier, 2),
        None => round_to(adjusted_days, 2).min(1.0),
    };

    CreditOutcome {
        days_credited,
        total_minutes,
        credit_basis_minutes,
        late_deduction,
        adjusted_days,
        is_holiday_attendance: holiday.is_some(),
        multiplier_applied,
    }
}
