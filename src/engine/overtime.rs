use crate::engine::round_to;
use crate::model::holiday::Holiday;

/// Multiplier for approved overtime on a date whose holiday (if any) is `holiday`.
///
/// `ot_multiplier` when the holiday applies multipliers and has a positive
/// one, else a positive `default_multiplier`, else 1.00.
pub fn overtime_multiplier(holiday: Option<&Holiday>) -> f64 {
    let Some(holiday) = holiday else {
        return 1.0;
    };

    if holiday.apply_multiplier && holiday.ot_multiplier > 0.0 {
        holiday.ot_multiplier
    } else if holiday.default_multiplier > 0.0 {
        holiday.default_multiplier
    } else {
        1.0
    }
}

/// `hours_requested * multiplier_used`, rounded to 4 decimals.
pub fn computed_overtime(hours_requested: f64, multiplier_used: f64) -> f64 {
    round_to(hours_requested * multiplier_used, 4)
}
