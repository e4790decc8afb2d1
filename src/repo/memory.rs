//! In-memory storage.
//!
//! Thread-safe, backed by one mutex so every ledger submission sees and
//! commits a consistent snapshot. Used by tests and local development.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{AttendanceRepository, HolidayRepository, LateRuleRepository, LeaveLedger, ShiftRepository};
use crate::error::{HrisError, HrisResult};
use crate::model::attendance::AttendanceRecord;
use crate::model::holiday::Holiday;
use crate::model::late_rule::LateDeductionRule;
use crate::model::leave_request::{
    LeaveBalance, LeaveDeductionLog, LeaveReceipt, LeaveRequest, LeaveStatus, NewLeaveRequest,
};
use crate::model::shift::{EmployeeSchedule, ShiftSchedule};

#[derive(Debug, Default)]
struct MemoryState {
    shifts: HashMap<u64, ShiftSchedule>,
    schedules: Vec<EmployeeSchedule>,
    holidays: Vec<Holiday>,
    late_rules: Vec<LateDeductionRule>,
    attendance: HashMap<(u64, NaiveDate), AttendanceRecord>,
    leave_requests: Vec<LeaveRequest>,
    balances: HashMap<(u64, u64, i32), LeaveBalance>,
    deduction_logs: Vec<LeaveDeductionLog>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    fail_deduction_log: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> HrisResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| HrisError::Storage("memory store lock poisoned".to_string()))
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> T {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    pub fn add_shift(&self, schedule: ShiftSchedule) {
        self.with_state(|s| {
            s.shifts.insert(schedule.shift.id, schedule);
        });
    }

    pub fn assign_shift(
        &self,
        employee_id: u64,
        work_time_id: u64,
        effective_from: NaiveDate,
        effective_until: Option<NaiveDate>,
    ) {
        self.with_state(|s| {
            let id = s.schedules.len() as u64 + 1;
            s.schedules.push(EmployeeSchedule {
                id,
                employee_id,
                work_time_id,
                effective_from,
                effective_until,
            });
        });
    }

    pub fn add_holiday(&self, holiday: Holiday) {
        self.with_state(|s| s.holidays.push(holiday));
    }

    pub fn add_late_rule(&self, rule: LateDeductionRule) {
        self.with_state(|s| s.late_rules.push(rule));
    }

    /// Opens (or resets) a balance row with `leave_balance = limit - used`.
    pub fn set_leave_balance(
        &self,
        employee_id: u64,
        leave_type_id: u64,
        year: i32,
        leave_limit: f64,
        leave_used: f64,
    ) {
        self.with_state(|s| {
            s.balances.insert(
                (employee_id, leave_type_id, year),
                LeaveBalance {
                    employee_id,
                    leave_type_id,
                    year,
                    leave_limit,
                    leave_used,
                    leave_balance: leave_limit - leave_used,
                },
            );
        });
    }

    /// Makes every following deduction-log insert fail, to exercise rollback.
    pub fn fail_deduction_log_inserts(&self, fail: bool) {
        self.fail_deduction_log.store(fail, Ordering::SeqCst);
    }

    pub fn leave_requests(&self) -> Vec<LeaveRequest> {
        self.with_state(|s| s.leave_requests.clone())
    }

    pub fn deduction_logs(&self) -> Vec<LeaveDeductionLog> {
        self.with_state(|s| s.deduction_logs.clone())
    }
}

#[async_trait]
impl ShiftRepository for MemoryStore {
    async fn shift_for(&self, employee_id: u64, date: NaiveDate) -> HrisResult<Option<ShiftSchedule>> {
        let state = self.state()?;
        let assignment = state
            .schedules
            .iter()
            .filter(|s| s.employee_id == employee_id && s.covers(date))
            .max_by_key(|s| (s.effective_from, s.id));

        Ok(assignment.and_then(|a| state.shifts.get(&a.work_time_id).cloned()))
    }
}

#[async_trait]
impl HolidayRepository for MemoryStore {
    async fn holiday_candidates(&self, _date: NaiveDate) -> HrisResult<Vec<Holiday>> {
        Ok(self.state()?.holidays.clone())
    }
}

#[async_trait]
impl LateRuleRepository for MemoryStore {
    async fn late_rules(&self) -> HrisResult<Vec<LateDeductionRule>> {
        Ok(self.state()?.late_rules.clone())
    }
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn save_credit(&self, record: &AttendanceRecord) -> HrisResult<()> {
        let mut state = self.state()?;
        let key = (record.employee_id, record.attendance_date);
        let overtime_request = state.attendance.get(&key).and_then(|r| r.overtime_request);
        state.attendance.insert(
            key,
            AttendanceRecord {
                overtime_request,
                ..record.clone()
            },
        );
        Ok(())
    }

    async fn set_overtime(
        &self,
        employee_id: u64,
        attendance_date: NaiveDate,
        computed_overtime: f64,
    ) -> HrisResult<bool> {
        let mut state = self.state()?;
        match state.attendance.get_mut(&(employee_id, attendance_date)) {
            Some(record) => {
                record.overtime_request = Some(computed_overtime);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_attendance(
        &self,
        employee_id: u64,
        attendance_date: NaiveDate,
    ) -> HrisResult<Option<AttendanceRecord>> {
        Ok(self
            .state()?
            .attendance
            .get(&(employee_id, attendance_date))
            .cloned())
    }
}

#[async_trait]
impl LeaveLedger for MemoryStore {
    async fn submit_leave(&self, request: &NewLeaveRequest, year: i32) -> HrisResult<LeaveReceipt> {
        let mut state = self.state()?;

        // Stage all three writes; commit only if every step succeeds.
        let leave_id = state.leave_requests.iter().map(|r| r.leave_id).max().unwrap_or(0) + 1;
        let staged_request = LeaveRequest {
            leave_id,
            employee_id: request.employee_id,
            leave_type_id: request.leave_type_id,
            date_from: request.date_from,
            date_until: request.date_until,
            total_days: request.total_days,
            reason: request.reason.clone(),
            status: LeaveStatus::Pending.as_str().to_string(),
            approver_id: None,
            approval_remarks: None,
        };

        let key = (request.employee_id, request.leave_type_id, year);
        let mut staged_balance = state.balances.get(&key).cloned().ok_or_else(|| {
            HrisError::LedgerRolledBack(format!(
                "no leave balance for employee {} leave type {} in {}",
                request.employee_id, request.leave_type_id, year
            ))
        })?;
        staged_balance.leave_used += request.total_days;
        staged_balance.leave_balance = staged_balance.leave_limit - staged_balance.leave_used;

        if self.fail_deduction_log.load(Ordering::SeqCst) {
            return Err(HrisError::LedgerRolledBack(
                "deduction log insert failed".to_string(),
            ));
        }
        let log_id = state.deduction_logs.len() as u64 + 1;
        let staged_log = LeaveDeductionLog {
            id: log_id,
            employee_id: request.employee_id,
            leave_type_id: request.leave_type_id,
            leave_id,
            deducted_days: request.total_days,
        };

        let receipt = LeaveReceipt {
            leave_id,
            leave_used: staged_balance.leave_used,
            leave_balance: staged_balance.leave_balance,
        };
        state.leave_requests.push(staged_request);
        state.balances.insert(key, staged_balance);
        state.deduction_logs.push(staged_log);

        Ok(receipt)
    }

    async fn leave_balance(
        &self,
        employee_id: u64,
        leave_type_id: u64,
        year: i32,
    ) -> HrisResult<Option<LeaveBalance>> {
        Ok(self
            .state()?
            .balances
            .get(&(employee_id, leave_type_id, year))
            .cloned())
    }

    async fn deductions_for(&self, leave_id: u64) -> HrisResult<Vec<LeaveDeductionLog>> {
        Ok(self
            .state()?
            .deduction_logs
            .iter()
            .filter(|log| log.leave_id == leave_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shift::{BreakWindow, Shift};
    use chrono::NaiveTime;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule(id: u64, start_hour: u32) -> ShiftSchedule {
        ShiftSchedule {
            shift: Shift {
                id,
                start_time: NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(start_hour + 9, 0, 0).unwrap(),
                total_minutes: 540,
            },
            breaks: vec![BreakWindow {
                id,
                shift_id: id,
                break_start: NaiveTime::from_hms_opt(start_hour + 3, 0, 0).unwrap(),
                break_end: NaiveTime::from_hms_opt(start_hour + 4, 0, 0).unwrap(),
                break_minutes: 60,
            }],
        }
    }

    fn leave(employee_id: u64, leave_type_id: u64, total_days: f64) -> NewLeaveRequest {
        NewLeaveRequest {
            employee_id,
            leave_type_id,
            date_from: date(2025, 7, 1),
            date_until: date(2025, 7, 3),
            total_days,
            reason: Some("family".to_string()),
        }
    }

    #[tokio::test]
    async fn test_shift_for_picks_latest_effective_assignment() {
        let store = MemoryStore::new();
        store.add_shift(schedule(1, 9));
        store.add_shift(schedule(2, 7));
        store.assign_shift(10, 1, date(2025, 1, 1), None);
        store.assign_shift(10, 2, date(2025, 6, 1), Some(date(2025, 6, 30)));

        let may = store.shift_for(10, date(2025, 5, 31)).await.unwrap().unwrap();
        assert_eq!(may.shift.id, 1);
        let june = store.shift_for(10, date(2025, 6, 15)).await.unwrap().unwrap();
        assert_eq!(june.shift.id, 2);
        let july = store.shift_for(10, date(2025, 7, 1)).await.unwrap().unwrap();
        assert_eq!(july.shift.id, 1);

        assert!(store.shift_for(11, date(2025, 6, 15)).await.unwrap().is_none());
        assert!(store.shift_for(10, date(2024, 12, 31)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recredit_keeps_overtime() {
        let store = MemoryStore::new();
        let record = AttendanceRecord {
            attendance_date: date(2025, 6, 2),
            employee_id: 10,
            employee_name: "Ana Reyes".to_string(),
            work_time_id: 1,
            time_in_morning: None,
            time_out_morning: None,
            time_in_afternoon: None,
            time_out_afternoon: None,
            days_credited: 0.5,
            is_holiday_attendance: false,
            overtime_request: None,
        };
        store.save_credit(&record).await.unwrap();
        assert!(store.set_overtime(10, date(2025, 6, 2), 3.0).await.unwrap());

        let recredited = AttendanceRecord {
            days_credited: 1.0,
            ..record.clone()
        };
        store.save_credit(&recredited).await.unwrap();

        let stored = store.find_attendance(10, date(2025, 6, 2)).await.unwrap().unwrap();
        assert_eq!(stored.days_credited, 1.0);
        assert_eq!(stored.overtime_request, Some(3.0));
    }

    #[tokio::test]
    async fn test_set_overtime_without_row_reports_missing() {
        let store = MemoryStore::new();
        assert!(!store.set_overtime(10, date(2025, 6, 2), 3.0).await.unwrap());
    }

    #[tokio::test]
    async fn test_submit_leave_writes_all_three_rows() {
        let store = MemoryStore::new();
        store.set_leave_balance(10, 1, 2025, 15.0, 2.0);

        let receipt = store.submit_leave(&leave(10, 1, 3.0), 2025).await.unwrap();
        assert_eq!(receipt.leave_id, 1);
        assert_eq!(receipt.leave_used, 5.0);
        assert_eq!(receipt.leave_balance, 10.0);

        let requests = store.leave_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].status, "Pending");

        let logs = store.deductions_for(receipt.leave_id).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].deducted_days, 3.0);

        let balance = store.leave_balance(10, 1, 2025).await.unwrap().unwrap();
        assert_eq!(balance.leave_balance, balance.leave_limit - balance.leave_used);
    }

    #[tokio::test]
    async fn test_missing_balance_rolls_back_everything() {
        let store = MemoryStore::new();
        store.set_leave_balance(10, 1, 2025, 15.0, 0.0);

        let err = store.submit_leave(&leave(10, 99, 1.0), 2025).await.unwrap_err();
        assert!(matches!(err, HrisError::LedgerRolledBack(_)));
        assert!(store.leave_requests().is_empty());
        assert!(store.deduction_logs().is_empty());
    }

    #[tokio::test]
    async fn test_balance_from_another_year_is_not_used() {
        let store = MemoryStore::new();
        store.set_leave_balance(10, 1, 2024, 15.0, 0.0);

        assert!(store.submit_leave(&leave(10, 1, 1.0), 2025).await.is_err());
        let untouched = store.leave_balance(10, 1, 2024).await.unwrap().unwrap();
        assert_eq!(untouched.leave_used, 0.0);
    }

    #[tokio::test]
    async fn test_log_failure_rolls_back_request_and_balance() {
        let store = MemoryStore::new();
        store.set_leave_balance(10, 1, 2025, 15.0, 0.0);
        store.fail_deduction_log_inserts(true);

        assert!(store.submit_leave(&leave(10, 1, 2.0), 2025).await.is_err());
        assert!(store.leave_requests().is_empty());
        assert!(store.deduction_logs().is_empty());
        let balance = store.leave_balance(10, 1, 2025).await.unwrap().unwrap();
        assert_eq!(balance.leave_used, 0.0);
        assert_eq!(balance.leave_balance, 15.0);
    }

    #[tokio::test]
    async fn test_exhausted_balance_still_accepts_request() {
        let store = MemoryStore::new();
        store.set_leave_balance(10, 1, 2025, 15.0, 15.0);

        let receipt = store.submit_leave(&leave(10, 1, 1.0), 2025).await.unwrap();
        assert_eq!(receipt.leave_used, 16.0);
        assert!(receipt.leave_balance <= 0.0);
        assert_eq!(store.leave_requests().len(), 1);
        assert_eq!(store.deduction_logs().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_do_not_lose_updates() {
        let store = Arc::new(MemoryStore::new());
        store.set_leave_balance(10, 1, 2025, 30.0, 0.0);

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.submit_leave(&leave(10, 1, 1.0), 2025).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let balance = store.leave_balance(10, 1, 2025).await.unwrap().unwrap();
        assert_eq!(balance.leave_used, 20.0);
        assert_eq!(balance.leave_balance, 10.0);

        let mut ids: Vec<u64> = store.leave_requests().iter().map(|r| r.leave_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);
        assert_eq!(store.deduction_logs().len(), 20);
    }
}
