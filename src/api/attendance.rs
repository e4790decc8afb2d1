use crate::auth::auth::AuthUser;
use crate::engine::Punches;
use crate::error::{HrisError, HrisResult};
use crate::model::attendance::AttendanceRecord;
use crate::model::shift::BreakWindow;
use crate::service::attendance::{self as attendance_service, AttendanceSubmission};
use crate::state::AppState;
use crate::utils::time_parse::{parse_punch, parse_required_date};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AttendanceRequest {
    #[schema(example = "2025-06-12")]
    pub attendance_date: Option<String>,
    #[schema(example = 1001)]
    pub employee_id: Option<u64>,
    #[schema(example = "Jane Cruz")]
    pub employee_name: Option<String>,
    #[schema(example = "09:00:00", nullable = true)]
    pub time_in_morning: Option<String>,
    #[schema(example = "12:00:00", nullable = true)]
    pub time_out_morning: Option<String>,
    #[schema(example = "13:00:00", nullable = true)]
    pub time_in_afternoon: Option<String>,
    #[schema(example = "18:00:00", nullable = true)]
    pub time_out_afternoon: Option<String>,
}

impl AttendanceRequest {
    pub fn into_submission(self) -> HrisResult<AttendanceSubmission> {
        let attendance_date =
            parse_required_date("attendance_date", self.attendance_date.as_deref())?;
        let employee_id = self
            .employee_id
            .filter(|id| *id > 0)
            .ok_or_else(|| HrisError::Validation("employee_id is required".to_string()))?;
        let employee_name = self
            .employee_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| HrisError::Validation("employee_name is required".to_string()))?;

        Ok(AttendanceSubmission {
            attendance_date,
            employee_id,
            employee_name,
            punches: Punches {
                time_in_morning: parse_punch("time_in_morning", self.time_in_morning.as_deref())?,
                time_out_morning: parse_punch("time_out_morning", self.time_out_morning.as_deref())?,
                time_in_afternoon: parse_punch(
                    "time_in_afternoon",
                    self.time_in_afternoon.as_deref(),
                )?,
                time_out_afternoon: parse_punch(
                    "time_out_afternoon",
                    self.time_out_afternoon.as_deref(),
                )?,
            },
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreditDebug {
    #[schema(example = 480.0)]
    pub total_minutes: f64,
    #[schema(example = 480.0)]
    pub credit_basis_minutes: f64,
    pub breaks: Vec<BreakWindow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceCreditResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = 1.0)]
    pub days_credited: f64,
    pub debug: CreditDebug,
}

/// Record attendance and compute the day credit
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body(
        content = AttendanceRequest,
        description = "Punches for one employee on one date",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Attendance credited", body = AttendanceCreditResponse),
        (status = 400, description = "Missing or malformed fields", body = Object, example = json!({
            "success": false,
            "message": "employee_id is required"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "No shift assigned", body = Object, example = json!({
            "success": false,
            "message": "No shift assigned for employee 1001 on 2025-06-12"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn record_attendance(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<AttendanceRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_attendance_writer()?;

    let submission = payload.into_inner().into_submission()?;
    let employee_id = submission.employee_id;

    let recorded = attendance_service::record_attendance(&state, submission)
        .await
        .map_err(|e| {
            if e.is_internal() {
                tracing::error!(error = %e, employee_id, "Attendance credit failed");
            }
            e
        })?;

    Ok(HttpResponse::Ok().json(AttendanceCreditResponse {
        success: true,
        days_credited: recorded.outcome.days_credited,
        debug: CreditDebug {
            total_minutes: recorded.outcome.total_minutes,
            credit_basis_minutes: recorded.outcome.credit_basis_minutes,
            breaks: recorded.breaks,
        },
    }))
}

/// Fetch the stored attendance row for one employee and date
#[utoipa::path(
    get,
    path = "/api/attendance/{employee_id}/{attendance_date}",
    params(
        ("employee_id" = u64, Path, description = "Employee ID"),
        ("attendance_date" = String, Path, description = "Date in YYYY-MM-DD format")
    ),
    responses(
        (status = 200, description = "Attendance record found", body = AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Attendance record not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<(u64, String)>,
) -> actix_web::Result<impl Responder> {
    let (employee_id, raw_date) = path.into_inner();
    auth.require_self_or_staff(employee_id)?;
    let attendance_date = parse_required_date("attendance_date", Some(raw_date.as_str()))?;

    let record = state
        .attendance
        .find_attendance(employee_id, attendance_date)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch attendance record");
            e
        })?;

    match record {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Err(HrisError::NotFound("Attendance record not found".to_string()).into()),
    }
}
