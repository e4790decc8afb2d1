use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::model::late_rule::LateDeductionRule;
use crate::model::shift::ShiftSchedule;

/// TTL cache for reference data that the credit calculation reads on every
/// request: shifts (with breaks) by `work_time_id`, and the late rule table.
/// Attendance rows and leave balances never go through here.
#[derive(Clone)]
pub struct ReferenceCache {
    shifts: Cache<u64, ShiftSchedule>,
    late_rules: Cache<(), Arc<Vec<LateDeductionRule>>>,
}

impl ReferenceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            shifts: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(ttl)
                .build(),
            late_rules: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    pub async fn shift(&self, work_time_id: u64) -> Option<ShiftSchedule> {
        self.shifts.get(&work_time_id).await
    }

    pub async fn store_shift(&self, schedule: ShiftSchedule) {
        self.shifts.insert(schedule.shift.id, schedule).await;
    }

    pub async fn late_rules(&self) -> Option<Arc<Vec<LateDeductionRule>>> {
        self.late_rules.get(&()).await
    }

    pub async fn store_late_rules(&self, rules: Vec<LateDeductionRule>) -> Arc<Vec<LateDeductionRule>> {
        let rules = Arc::new(rules);
        self.late_rules.insert((), rules.clone()).await;
        rules
    }
}
