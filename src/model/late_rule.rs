use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// One tier of `late_deduction_rules`: punches in `[time_from, time_to]` lose `deduction` days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LateDeductionRule {
    pub id: u64,
    pub time_from: NaiveTime,
    pub time_to: NaiveTime,
    pub deduction: f64,
}
