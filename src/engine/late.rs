//! Late-arrival deduction lookup.
//!
//! How a punched time maps onto a deduction is a policy of its own, so the
//! credit calculator only sees the [`LateDeductionPolicy`] trait. The stock
//! policy is [`LateDeductionTable`], built from the `late_deduction_rules`
//! tiers.

use chrono::NaiveTime;

use crate::model::late_rule::LateDeductionRule;

/// Maps a late punch-in time to the fraction of a day it costs.
pub trait LateDeductionPolicy {
    fn deduction_for(&self, time_in: NaiveTime) -> f64;
}

impl<F> LateDeductionPolicy for F
where
    F: Fn(NaiveTime) -> f64,
{
    fn deduction_for(&self, time_in: NaiveTime) -> f64 {
        self(time_in)
    }
}

/// Policy that never deducts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLateDeduction;

impl LateDeductionPolicy for NoLateDeduction {
    fn deduction_for(&self, _time_in: NaiveTime) -> f64 {
        0.0
    }
}

/// Tiered rule table. A time matches a tier when `time_from <= t <= time_to`;
/// overlapping tiers resolve to the one with the earliest `time_from` (then
/// lowest id). A time matching no tier deducts nothing.
#[derive(Debug, Clone, Default)]
pub struct LateDeductionTable {
    rules: Vec<LateDeductionRule>,
}

impl LateDeductionTable {
    pub fn new(mut rules: Vec<LateDeductionRule>) -> Self {
        rules.sort_by(|a, b| a.time_from.cmp(&b.time_from).then(a.id.cmp(&b.id)));
        Self { rules }
    }

    pub fn rules(&self) -> &[LateDeductionRule] {
        &self.rules
    }
}

impl LateDeductionPolicy for LateDeductionTable {
    fn deduction_for(&self, time_in: NaiveTime) -> f64 {
        self.rules
            .iter()
            .find(|rule| rule.time_from <= time_in && time_in <= rule.time_to)
            .map_or(0.0, |rule| rule.deduction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn rule(id: u64, from: NaiveTime, to: NaiveTime, deduction: f64) -> LateDeductionRule {
        LateDeductionRule {
            id,
            time_from: from,
            time_to: to,
            deduction,
        }
    }

    fn morning_table() -> LateDeductionTable {
        LateDeductionTable::new(vec![
            rule(2, time(9, 16, 0), time(9, 30, 59), 0.1),
            rule(1, time(9, 1, 0), time(9, 15, 59), 0.05),
            rule(3, time(9, 31, 0), time(10, 0, 0), 0.25),
        ])
    }

    #[test]
    fn test_rules_are_sorted_by_start() {
        let table = morning_table();
        let ids: Vec<u64> = table.rules().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        let table = morning_table();
        assert_eq!(table.deduction_for(time(9, 1, 0)), 0.05);
        assert_eq!(table.deduction_for(time(9, 15, 0)), 0.05);
        assert_eq!(table.deduction_for(time(9, 15, 59)), 0.05);
        assert_eq!(table.deduction_for(time(9, 16, 0)), 0.1);
        assert_eq!(table.deduction_for(time(10, 0, 0)), 0.25);
    }

    #[test]
    fn test_unmatched_time_deducts_nothing() {
        let table = morning_table();
        assert_eq!(table.deduction_for(time(9, 0, 30)), 0.0);
        assert_eq!(table.deduction_for(time(11, 0, 0)), 0.0);
        assert_eq!(LateDeductionTable::default().deduction_for(time(9, 5, 0)), 0.0);
    }

    #[test]
    fn test_overlapping_tiers_take_earliest_start() {
        let table = LateDeductionTable::new(vec![
            rule(9, time(9, 10, 0), time(9, 20, 0), 0.2),
            rule(4, time(9, 0, 0), time(9, 30, 0), 0.1),
        ]);
        assert_eq!(table.deduction_for(time(9, 15, 0)), 0.1);
    }

    #[test]
    fn test_closures_are_policies() {
        let flat = |_t: NaiveTime| 0.05;
        assert_eq!(flat.deduction_for(time(13, 30, 0)), 0.05);
        assert_eq!(NoLateDeduction.deduction_for(time(13, 30, 0)), 0.0);
    }
}
