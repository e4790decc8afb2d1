//! Pure attendance-credit and multiplier rules.
//!
//! Nothing in this module touches storage. Repositories hand the engine
//! reference data (shifts, breaks, holidays, late tiers) and the engine
//! returns plain values, which keeps every rule testable without a database.

pub mod credit;
pub mod holiday;
pub mod late;
pub mod overlap;
pub mod overtime;

pub use credit::{CreditOutcome, Punches, calculate_credit};
pub use holiday::{holiday_applies, resolve_holiday};
pub use late::{LateDeductionPolicy, LateDeductionTable, NoLateDeduction};
pub use overlap::overlap_minutes;
pub use overtime::{computed_overtime, overtime_multiplier};

/// Rounds half away from zero to `places` decimals.
///
/// The scaled value is first cut to 15 significant digits, so decimal
/// midpoints such as 0.145 that binary floats store just below the half
/// still round up.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    let trimmed: f64 = format!("{scaled:.14e}").parse().unwrap_or(scaled);
    trimmed.round() / factor
}
