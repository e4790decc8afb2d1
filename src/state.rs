//! Shared application state handed to every handler.

use sqlx::MySqlPool;
use std::sync::Arc;
use std::time::Duration;

use crate::repo::mysql::MySqlStore;
use crate::repo::{
    AttendanceRepository, HolidayRepository, LateRuleRepository, LeaveLedger, ShiftRepository,
};

/// Storage handles for each component, injected once at startup.
#[derive(Clone)]
pub struct AppState {
    pub shifts: Arc<dyn ShiftRepository>,
    pub holidays: Arc<dyn HolidayRepository>,
    pub late_rules: Arc<dyn LateRuleRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub leave: Arc<dyn LeaveLedger>,
}

impl AppState {
    /// Uses one store for every component.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ShiftRepository
            + HolidayRepository
            + LateRuleRepository
            + AttendanceRepository
            + LeaveLedger
            + 'static,
    {
        Self {
            shifts: store.clone(),
            holidays: store.clone(),
            late_rules: store.clone(),
            attendance: store.clone(),
            leave: store,
        }
    }

    pub fn mysql(pool: MySqlPool, cache_ttl: Duration) -> Self {
        Self::from_store(Arc::new(MySqlStore::new(pool, cache_ttl)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::memory::MemoryStore;

    #[test]
    fn test_app_state_is_clone_and_send() {
        fn assert_bounds<T: Clone + Send + Sync + 'static>() {}
        assert_bounds::<AppState>();
        let _ = AppState::from_store(Arc::new(MemoryStore::new())).clone();
    }
}
