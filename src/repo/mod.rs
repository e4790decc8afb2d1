//! Storage seams.
//!
//! Each component gets its storage as a trait object so the same services
//! run against MySQL in production and [`memory::MemoryStore`] in tests.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::HrisResult;
use crate::model::attendance::AttendanceRecord;
use crate::model::holiday::Holiday;
use crate::model::late_rule::LateDeductionRule;
use crate::model::leave_request::{LeaveBalance, LeaveDeductionLog, LeaveReceipt, NewLeaveRequest};
use crate::model::shift::ShiftSchedule;

#[async_trait]
pub trait ShiftRepository: Send + Sync {
    /// The shift (with breaks) assigned to `employee_id` on `date`, if any.
    async fn shift_for(&self, employee_id: u64, date: NaiveDate) -> HrisResult<Option<ShiftSchedule>>;
}

#[async_trait]
pub trait HolidayRepository: Send + Sync {
    /// Holidays that may be in force on `date`. Callers pick the winner with
    /// [`crate::engine::resolve_holiday`].
    async fn holiday_candidates(&self, date: NaiveDate) -> HrisResult<Vec<Holiday>>;
}

#[async_trait]
pub trait LateRuleRepository: Send + Sync {
    async fn late_rules(&self) -> HrisResult<Vec<LateDeductionRule>>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Creates or re-credits the row for (employee_id, attendance_date).
    /// `overtime_request` of an existing row is left untouched.
    async fn save_credit(&self, record: &AttendanceRecord) -> HrisResult<()>;

    /// Sets `overtime_request` on an existing row. Returns `false` when no row matches.
    async fn set_overtime(
        &self,
        employee_id: u64,
        attendance_date: NaiveDate,
        computed_overtime: f64,
    ) -> HrisResult<bool>;

    async fn find_attendance(
        &self,
        employee_id: u64,
        attendance_date: NaiveDate,
    ) -> HrisResult<Option<AttendanceRecord>>;
}

#[async_trait]
pub trait LeaveLedger: Send + Sync {
    /// Inserts the request, deducts the `year` balance and appends the
    /// deduction log as one unit. On any failure nothing is kept.
    async fn submit_leave(&self, request: &NewLeaveRequest, year: i32) -> HrisResult<LeaveReceipt>;

    async fn leave_balance(
        &self,
        employee_id: u64,
        leave_type_id: u64,
        year: i32,
    ) -> HrisResult<Option<LeaveBalance>>;

    async fn deductions_for(&self, leave_id: u64) -> HrisResult<Vec<LeaveDeductionLog>>;
}
