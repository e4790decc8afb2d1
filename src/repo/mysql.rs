//! MySQL storage.
//!
//! All statements are parameterized. Writes that must stay consistent run in
//! an explicit transaction taken from the pool.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use sqlx::{MySql, MySqlPool, Transaction};
use std::time::Duration;

use super::{AttendanceRepository, HolidayRepository, LateRuleRepository, LeaveLedger, ShiftRepository};
use crate::error::{HrisError, HrisResult};
use crate::model::attendance::AttendanceRecord;
use crate::model::holiday::{Holiday, HolidayRow};
use crate::model::late_rule::LateDeductionRule;
use crate::model::leave_request::{
    LeaveBalance, LeaveDeductionLog, LeaveReceipt, LeaveStatus, NewLeaveRequest,
};
use crate::model::shift::{BreakWindow, Shift, ShiftSchedule};
use crate::utils::reference_cache::ReferenceCache;

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
    cache: ReferenceCache,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool, cache_ttl: Duration) -> Self {
        Self {
            pool,
            cache: ReferenceCache::new(cache_ttl),
        }
    }

    async fn load_shift(&self, work_time_id: u64) -> HrisResult<Option<ShiftSchedule>> {
        if let Some(schedule) = self.cache.shift(work_time_id).await {
            return Ok(Some(schedule));
        }

        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, start_time, end_time, total_minutes
            FROM work_times
            WHERE id = ?
            "#,
        )
        .bind(work_time_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(shift) = shift else {
            return Ok(None);
        };

        let breaks = sqlx::query_as::<_, BreakWindow>(
            r#"
            SELECT id, work_time_id, break_start, break_end, break_minutes
            FROM work_time_breaks
            WHERE work_time_id = ?
            ORDER BY break_start, id
            "#,
        )
        .bind(work_time_id)
        .fetch_all(&self.pool)
        .await?;

        let schedule = ShiftSchedule { shift, breaks };
        self.cache.store_shift(schedule.clone()).await;
        Ok(Some(schedule))
    }
}

#[async_trait]
impl ShiftRepository for MySqlStore {
    async fn shift_for(&self, employee_id: u64, date: NaiveDate) -> HrisResult<Option<ShiftSchedule>> {
        let work_time_id = sqlx::query_scalar::<_, u64>(
            r#"
            SELECT work_time_id
            FROM employee_work_schedules
            WHERE employee_id = ?
            AND effective_from <= ?
            AND (effective_until IS NULL OR effective_until >= ?)
            ORDER BY effective_from DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        match work_time_id {
            Some(id) => self.load_shift(id).await,
            None => Ok(None),
        }
    }
}

#[async_trait]
impl HolidayRepository for MySqlStore {
    async fn holiday_candidates(&self, date: NaiveDate) -> HrisResult<Vec<Holiday>> {
        let rows = sqlx::query_as::<_, HolidayRow>(
            r#"
            SELECT
                id,
                holiday_name,
                holiday_date,
                is_recurring,
                CAST(extended_until AS CHAR) AS extended_until,
                default_multiplier,
                ot_multiplier,
                apply_multiplier
            FROM holidays
            WHERE holiday_date = ?
            OR (is_recurring = 1 AND MONTH(holiday_date) = ? AND DAY(holiday_date) = ?)
            "#,
        )
        .bind(date)
        .bind(date.month())
        .bind(date.day())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Holiday::from).collect())
    }
}

#[async_trait]
impl LateRuleRepository for MySqlStore {
    async fn late_rules(&self) -> HrisResult<Vec<LateDeductionRule>> {
        if let Some(rules) = self.cache.late_rules().await {
            return Ok(rules.as_ref().clone());
        }

        let rules = sqlx::query_as::<_, LateDeductionRule>(
            r#"
            SELECT id, time_from, time_to, deduction
            FROM late_deduction_rules
            ORDER BY time_from, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let rules = self.cache.store_late_rules(rules).await;
        Ok(rules.as_ref().clone())
    }
}

#[async_trait]
impl AttendanceRepository for MySqlStore {
    async fn save_credit(&self, record: &AttendanceRecord) -> HrisResult<()> {
        let mut tx = self.pool.begin().await?;

        // Holds the (employee, date) row, or the gap for it, until commit.
        sqlx::query(
            r#"
            SELECT employee_id
            FROM attendance_records
            WHERE employee_id = ? AND attendance_date = ?
            FOR UPDATE
            "#,
        )
        .bind(record.employee_id)
        .bind(record.attendance_date)
        .fetch_optional(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO attendance_records
                (attendance_date, employee_id, employee_name, work_time_id,
                 time_in_morning, time_out_morning, time_in_afternoon, time_out_afternoon,
                 days_credited, is_holiday_attendance)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                employee_name = VALUES(employee_name),
                work_time_id = VALUES(work_time_id),
                time_in_morning = VALUES(time_in_morning),
                time_out_morning = VALUES(time_out_morning),
                time_in_afternoon = VALUES(time_in_afternoon),
                time_out_afternoon = VALUES(time_out_afternoon),
                days_credited = VALUES(days_credited),
                is_holiday_attendance = VALUES(is_holiday_attendance)
            "#,
        )
        .bind(record.attendance_date)
        .bind(record.employee_id)
        .bind(&record.employee_name)
        .bind(record.work_time_id)
        .bind(record.time_in_morning)
        .bind(record.time_out_morning)
        .bind(record.time_in_afternoon)
        .bind(record.time_out_afternoon)
        .bind(record.days_credited)
        .bind(record.is_holiday_attendance)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn set_overtime(
        &self,
        employee_id: u64,
        attendance_date: NaiveDate,
        computed_overtime: f64,
    ) -> HrisResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE attendance_records
            SET overtime_request = ?
            WHERE employee_id = ?
            AND attendance_date = ?
            "#,
        )
        .bind(computed_overtime)
        .bind(employee_id)
        .bind(attendance_date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // MySQL reports 0 affected rows when the value did not change, so a
        // repeated approval needs an existence check.
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM attendance_records
                WHERE employee_id = ? AND attendance_date = ?
            )
            "#,
        )
        .bind(employee_id)
        .bind(attendance_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_attendance(
        &self,
        employee_id: u64,
        attendance_date: NaiveDate,
    ) -> HrisResult<Option<AttendanceRecord>> {
        let record = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT attendance_date, employee_id, employee_name, work_time_id,
                   time_in_morning, time_out_morning, time_in_afternoon, time_out_afternoon,
                   days_credited, is_holiday_attendance, overtime_request
            FROM attendance_records
            WHERE employee_id = ?
            AND attendance_date = ?
            "#,
        )
        .bind(employee_id)
        .bind(attendance_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

async fn apply_leave_submission(
    tx: &mut Transaction<'_, MySql>,
    request: &NewLeaveRequest,
    year: i32,
) -> HrisResult<LeaveReceipt> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, leave_type_id, date_from, date_until, total_days, reason, status)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(request.employee_id)
    .bind(request.leave_type_id)
    .bind(request.date_from)
    .bind(request.date_until)
    .bind(request.total_days)
    .bind(request.reason.as_deref())
    .bind(LeaveStatus::Pending.as_str())
    .execute(&mut **tx)
    .await?;
    let leave_id = inserted.last_insert_id();

    // Single-statement increment: concurrent submissions serialize on the row lock.
    // MySQL applies SET assignments left to right, so leave_balance sees the new leave_used.
    let updated = sqlx::query(
        r#"
        UPDATE leave_balances
        SET leave_used = leave_used + ?,
            leave_balance = leave_limit - leave_used
        WHERE employee_id = ?
        AND leave_type_id = ?
        AND year = ?
        "#,
    )
    .bind(request.total_days)
    .bind(request.employee_id)
    .bind(request.leave_type_id)
    .bind(year)
    .execute(&mut **tx)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(HrisError::LedgerRolledBack(format!(
            "no leave balance for employee {} leave type {} in {}",
            request.employee_id, request.leave_type_id, year
        )));
    }

    sqlx::query(
        r#"
        INSERT INTO leave_deduction_logs
            (employee_id, leave_type_id, leave_id, deducted_days)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(request.employee_id)
    .bind(request.leave_type_id)
    .bind(leave_id)
    .bind(request.total_days)
    .execute(&mut **tx)
    .await?;

    let (leave_used, leave_balance) = sqlx::query_as::<_, (f64, f64)>(
        r#"
        SELECT leave_used, leave_balance
        FROM leave_balances
        WHERE employee_id = ?
        AND leave_type_id = ?
        AND year = ?
        "#,
    )
    .bind(request.employee_id)
    .bind(request.leave_type_id)
    .bind(year)
    .fetch_one(&mut **tx)
    .await?;

    Ok(LeaveReceipt {
        leave_id,
        leave_used,
        leave_balance,
    })
}

#[async_trait]
impl LeaveLedger for MySqlStore {
    async fn submit_leave(&self, request: &NewLeaveRequest, year: i32) -> HrisResult<LeaveReceipt> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| HrisError::LedgerRolledBack(e.to_string()))?;

        match apply_leave_submission(&mut tx, request, year).await {
            Ok(receipt) => {
                tx.commit()
                    .await
                    .map_err(|e| HrisError::LedgerRolledBack(e.to_string()))?;
                Ok(receipt)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "Leave submission rollback failed");
                }
                Err(match e {
                    HrisError::LedgerRolledBack(_) => e,
                    other => HrisError::LedgerRolledBack(other.to_string()),
                })
            }
        }
    }

    async fn leave_balance(
        &self,
        employee_id: u64,
        leave_type_id: u64,
        year: i32,
    ) -> HrisResult<Option<LeaveBalance>> {
        let balance = sqlx::query_as::<_, LeaveBalance>(
            r#"
            SELECT employee_id, leave_type_id, year, leave_limit, leave_used, leave_balance
            FROM leave_balances
            WHERE employee_id = ?
            AND leave_type_id = ?
            AND year = ?
            "#,
        )
        .bind(employee_id)
        .bind(leave_type_id)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        Ok(balance)
    }

    async fn deductions_for(&self, leave_id: u64) -> HrisResult<Vec<LeaveDeductionLog>> {
        let logs = sqlx::query_as::<_, LeaveDeductionLog>(
            r#"
            SELECT id, employee_id, leave_type_id, leave_id, deducted_days
            FROM leave_deduction_logs
            WHERE leave_id = ?
            ORDER BY id
            "#,
        )
        .bind(leave_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
