use crate::auth::auth::AuthUser;
use crate::error::{HrisError, HrisResult};
use crate::service::overtime::{self as overtime_service, OvertimeApproval};
use crate::state::AppState;
use crate::utils::time_parse::parse_required_date;
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct OvertimeApproveRequest {
    #[schema(example = 1001)]
    pub employee_id: Option<u64>,
    #[schema(example = "2025-12-25")]
    pub date_requested: Option<String>,
    #[schema(example = 2.5)]
    pub hours_requested: Option<f64>,
    /// Leave out to resolve it from the holiday calendar
    #[schema(example = 2.6, nullable = true)]
    pub multiplier_used: Option<f64>,
}

impl OvertimeApproveRequest {
    pub fn into_approval(self) -> HrisResult<OvertimeApproval> {
        let employee_id = self
            .employee_id
            .filter(|id| *id > 0)
            .ok_or_else(|| HrisError::Validation("employee_id is required".to_string()))?;
        let date_requested = parse_required_date("date_requested", self.date_requested.as_deref())?;
        let hours_requested = self
            .hours_requested
            .ok_or_else(|| HrisError::Validation("hours_requested is required".to_string()))?;

        Ok(OvertimeApproval {
            employee_id,
            date_requested,
            hours_requested,
            multiplier_used: self.multiplier_used,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OvertimeApproveResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = 6.5)]
    pub computed_overtime: f64,
    #[schema(example = 2.6)]
    pub multiplier_used: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OvertimeMultiplierResponse {
    #[schema(example = "2025-12-25")]
    pub date: String,
    #[schema(example = 2.6)]
    pub multiplier: f64,
}

/// Record approved overtime on an existing attendance row
#[utoipa::path(
    post,
    path = "/api/overtime/approve",
    request_body(
        content = OvertimeApproveRequest,
        description = "Approved overtime request",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Overtime recorded", body = OvertimeApproveResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Attendance record not found", body = Object, example = json!({
            "success": false,
            "message": "No attendance record for employee 1001 on 2025-12-25"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn approve_overtime(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<OvertimeApproveRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let approval = payload.into_inner().into_approval()?;
    let employee_id = approval.employee_id;

    let outcome = overtime_service::approve_overtime(&state, approval)
        .await
        .map_err(|e| {
            if e.is_internal() {
                tracing::error!(error = %e, employee_id, "Overtime approval failed");
            }
            e
        })?;

    Ok(HttpResponse::Ok().json(OvertimeApproveResponse {
        success: true,
        computed_overtime: outcome.computed_overtime,
        multiplier_used: outcome.multiplier_used,
    }))
}

/// Overtime multiplier that applies on a date
#[utoipa::path(
    get,
    path = "/api/overtime/multiplier/{date}",
    params(
        ("date" = String, Path, description = "Date in YYYY-MM-DD format")
    ),
    responses(
        (status = 200, description = "Resolved multiplier", body = OvertimeMultiplierResponse),
        (status = 400, description = "Malformed date"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn overtime_multiplier(
    _auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let raw_date = path.into_inner();
    let date = parse_required_date("date", Some(raw_date.as_str()))?;
    let multiplier = overtime_service::multiplier_for(&state, date).await?;

    Ok(HttpResponse::Ok().json(OvertimeMultiplierResponse {
        date: date.to_string(),
        multiplier,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_requires_hours() {
        let request = OvertimeApproveRequest {
            employee_id: Some(5),
            date_requested: Some("2025-06-02".to_string()),
            hours_requested: None,
            multiplier_used: None,
        };
        assert_eq!(
            request.into_approval().unwrap_err().to_string(),
            "hours_requested is required"
        );
    }

    #[test]
    fn test_approval_keeps_caller_multiplier() {
        let request = OvertimeApproveRequest {
            employee_id: Some(5),
            date_requested: Some("2025-06-02".to_string()),
            hours_requested: Some(1.5),
            multiplier_used: Some(1.25),
        };
        let approval = request.into_approval().unwrap();
        assert_eq!(approval.multiplier_used, Some(1.25));
        assert_eq!(approval.hours_requested, 1.5);
    }
}
