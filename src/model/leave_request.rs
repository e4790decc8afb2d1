use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 42)]
    pub leave_id: u64,
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = 2)]
    pub leave_type_id: u64,
    #[schema(example = "2025-07-01", format = "date", value_type = String)]
    pub date_from: NaiveDate,
    #[schema(example = "2025-07-03", format = "date", value_type = String)]
    pub date_until: NaiveDate,
    #[schema(example = 3.0)]
    pub total_days: f64,
    #[schema(example = "Family trip", nullable = true)]
    pub reason: Option<String>,
    #[schema(example = "Pending")]
    pub status: String,
    #[schema(nullable = true)]
    pub approver_id: Option<u64>,
    #[schema(nullable = true)]
    pub approval_remarks: Option<String>,
}

/// A validated leave submission, ready for the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLeaveRequest {
    pub employee_id: u64,
    pub leave_type_id: u64,
    pub date_from: NaiveDate,
    pub date_until: NaiveDate,
    pub total_days: f64,
    pub reason: Option<String>,
}

/// Per (employee, leave type, year). `leave_balance` is kept equal to `leave_limit - leave_used`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveBalance {
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = 2)]
    pub leave_type_id: u64,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 15.0)]
    pub leave_limit: f64,
    #[schema(example = 3.0)]
    pub leave_used: f64,
    #[schema(example = 12.0)]
    pub leave_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveDeductionLog {
    #[schema(example = 9)]
    pub id: u64,
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = 2)]
    pub leave_type_id: u64,
    #[schema(example = 42)]
    pub leave_id: u64,
    #[schema(example = 3.0)]
    pub deducted_days: f64,
}

/// What a successful ledger submission committed.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LeaveReceipt {
    #[schema(example = 42)]
    pub leave_id: u64,
    #[schema(example = 3.0)]
    pub leave_used: f64,
    #[schema(example = 12.0)]
    pub leave_balance: f64,
}
