use crate::auth::auth::AuthUser;
use crate::error::{HrisError, HrisResult};
use crate::model::leave_request::{LeaveBalance, LeaveDeductionLog, NewLeaveRequest};
use crate::service::leave as leave_service;
use crate::state::AppState;
use crate::utils::time_parse::parse_required_date;
use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Form body of a leave submission. Every field arrives as text and is
/// validated before the ledger is touched.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LeaveForm {
    #[schema(example = "1001")]
    pub employee_id: Option<String>,
    #[schema(example = "2")]
    pub leave_type_id: Option<String>,
    #[schema(example = "2025-07-01")]
    pub date_from: Option<String>,
    #[schema(example = "2025-07-03")]
    pub date_until: Option<String>,
    /// Defaults to the inclusive number of calendar days in the range
    #[schema(example = "3", nullable = true)]
    pub total_days: Option<String>,
    #[schema(example = "Family trip", nullable = true)]
    pub reason: Option<String>,
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_required_id(field: &str, raw: Option<&str>) -> HrisResult<u64> {
    let value = non_blank(raw).ok_or_else(|| HrisError::Validation(format!("{field} is required")))?;
    value
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| HrisError::Validation(format!("{field} must be a positive integer")))
}

impl LeaveForm {
    pub fn into_request(self) -> HrisResult<NewLeaveRequest> {
        let employee_id = parse_required_id("employee_id", self.employee_id.as_deref())?;
        let leave_type_id = parse_required_id("leave_type_id", self.leave_type_id.as_deref())?;
        let date_from = parse_required_date("date_from", self.date_from.as_deref())?;
        let date_until = parse_required_date("date_until", self.date_until.as_deref())?;

        if date_from > date_until {
            return Err(HrisError::Validation(
                "date_from cannot be after date_until".to_string(),
            ));
        }

        let total_days = match non_blank(self.total_days.as_deref()) {
            Some(raw) => raw
                .parse::<f64>()
                .map_err(|_| HrisError::Validation("total_days must be a number".to_string()))?,
            None => ((date_until - date_from).num_days() + 1) as f64,
        };
        if !total_days.is_finite() || total_days <= 0.0 {
            return Err(HrisError::Validation(
                "total_days must be greater than zero".to_string(),
            ));
        }

        Ok(NewLeaveRequest {
            employee_id,
            leave_type_id,
            date_from,
            date_until,
            total_days,
            reason: non_blank(self.reason.as_deref()).map(str::to_string),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveSubmitResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Leave request submitted")]
    pub message: String,
    #[schema(example = 42)]
    pub leave_id: u64,
    #[schema(example = 12.0)]
    pub leave_balance: f64,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct LeaveBalanceQuery {
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = 2)]
    pub leave_type_id: u64,
    /// Balance year, the current calendar year when omitted
    #[schema(example = 2025)]
    pub year: Option<i32>,
}

fn current_year() -> i32 {
    Local::now().year()
}

/// Submit a leave request and deduct the balance in one transaction
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = LeaveForm,
        description = "Leave request form",
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Leave request submitted", body = LeaveSubmitResponse),
        (status = 400, description = "Missing or malformed fields", body = Object, example = json!({
            "success": false,
            "message": "leave_type_id is required"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Ledger rolled back", body = Object, example = json!({
            "success": false,
            "message": "Server error: leave request could not be completed"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn submit_leave(
    auth: AuthUser,
    state: web::Data<AppState>,
    form: web::Form<LeaveForm>,
) -> actix_web::Result<impl Responder> {
    let form = form.into_inner();
    let employee_id = parse_required_id("employee_id", form.employee_id.as_deref())?;
    auth.require_self_or_staff(employee_id)?;
    let request = form.into_request()?;

    let receipt = leave_service::submit_leave(state.leave.as_ref(), &request, current_year()).await?;

    Ok(HttpResponse::Ok().json(LeaveSubmitResponse {
        success: true,
        message: "Leave request submitted".to_string(),
        leave_id: receipt.leave_id,
        leave_balance: receipt.leave_balance,
    }))
}

/// Current balance row for one employee, leave type and year
#[utoipa::path(
    get,
    path = "/api/leave/balance",
    params(LeaveBalanceQuery),
    responses(
        (status = 200, description = "Balance found", body = LeaveBalance),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No balance row for that year")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_balance(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<LeaveBalanceQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_self_or_staff(query.employee_id)?;
    let year = query.year.unwrap_or_else(current_year);

    let balance = state
        .leave
        .leave_balance(query.employee_id, query.leave_type_id, year)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id = query.employee_id, "Failed to fetch leave balance");
            e
        })?;

    match balance {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Err(HrisError::NotFound("Leave balance not found".to_string()).into()),
    }
}

/// Deduction log rows written for one leave request
#[utoipa::path(
    get,
    path = "/api/leave/{leave_id}/deductions",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request")
    ),
    responses(
        (status = 200, description = "Deduction log rows", body = Vec<LeaveDeductionLog>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_deductions(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    let leave_id = path.into_inner();

    let rows = state.leave.deductions_for(leave_id).await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave deductions");
        e
    })?;

    Ok(HttpResponse::Ok().json(rows))
}
