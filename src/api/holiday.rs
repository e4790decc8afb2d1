use crate::auth::auth::AuthUser;
use crate::engine::overtime_multiplier;
use crate::model::holiday::Holiday;
use crate::service::holiday::holiday_on;
use crate::state::AppState;
use crate::utils::time_parse::parse_required_date;
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HolidayLookupResponse {
    #[schema(example = "2025-06-12")]
    pub date: String,
    #[schema(nullable = true)]
    pub holiday: Option<Holiday>,
    /// Applied to a full day of attendance
    #[schema(example = 2.0)]
    pub attendance_multiplier: f64,
    #[schema(example = 2.6)]
    pub overtime_multiplier: f64,
}

/// Resolve the holiday in force on a date
#[utoipa::path(
    get,
    path = "/api/holiday/{date}",
    params(
        ("date" = String, Path, description = "Date in YYYY-MM-DD format")
    ),
    responses(
        (status = 200, description = "Resolved holiday, null on ordinary days", body = HolidayLookupResponse),
        (status = 400, description = "Malformed date"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Holiday"
)]
pub async fn get_holiday(
    _auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let raw_date = path.into_inner();
    let date = parse_required_date("date", Some(raw_date.as_str()))?;

    let holiday = holiday_on(state.holidays.as_ref(), date).await.map_err(|e| {
        tracing::error!(error = %e, %date, "Holiday lookup failed");
        e
    })?;

    Ok(HttpResponse::Ok().json(HolidayLookupResponse {
        date: date.to_string(),
        attendance_multiplier: holiday.as_ref().map_or(1.0, Holiday::attendance_multiplier),
        overtime_multiplier: overtime_multiplier(holiday.as_ref()),
        holiday,
    }))
}
