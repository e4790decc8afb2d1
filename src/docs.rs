use crate::api::attendance::{AttendanceCreditResponse, AttendanceRequest, CreditDebug};
use crate::api::holiday::HolidayLookupResponse;
use crate::api::leave_request::{LeaveBalanceQuery, LeaveForm, LeaveSubmitResponse};
use crate::api::overtime::{
    OvertimeApproveRequest, OvertimeApproveResponse, OvertimeMultiplierResponse,
};
use crate::model::attendance::AttendanceRecord;
use crate::model::holiday::Holiday;
use crate::model::leave_request::{LeaveBalance, LeaveDeductionLog};
use crate::model::shift::BreakWindow;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRIS Attendance & Leave API",
        version = "1.0.0",
        description = r#"
## Attendance credit and leave-balance ledger

The consistency core of the HRIS.

### 🔹 Key Features
- **Attendance Credit**
  - Turns four daily punches into a fractional day credit against the assigned shift
  - Break overlap, lateness tiers and holiday multipliers applied
- **Leave Ledger**
  - Request insert, balance deduction and audit log in one transaction
- **Overtime**
  - Holiday-aware multiplier and the computed overtime value

### 🔐 Security
Every endpoint requires a **JWT Bearer** access token.

### 📦 Response Format
Failures always answer `{ "success": false, "message": "..." }`.
"#,
    ),
    paths(
        crate::api::attendance::record_attendance,
        crate::api::attendance::get_attendance,

        crate::api::leave_request::submit_leave,
        crate::api::leave_request::leave_balance,
        crate::api::leave_request::leave_deductions,

        crate::api::overtime::approve_overtime,
        crate::api::overtime::overtime_multiplier,

        crate::api::holiday::get_holiday
    ),
    components(
        schemas(
            AttendanceRequest,
            AttendanceCreditResponse,
            CreditDebug,
            AttendanceRecord,
            BreakWindow,
            LeaveForm,
            LeaveSubmitResponse,
            LeaveBalanceQuery,
            LeaveBalance,
            LeaveDeductionLog,
            OvertimeApproveRequest,
            OvertimeApproveResponse,
            OvertimeMultiplierResponse,
            Holiday,
            HolidayLookupResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Attendance credit APIs"),
        (name = "Leave", description = "Leave ledger APIs"),
        (name = "Overtime", description = "Overtime approval APIs"),
        (name = "Holiday", description = "Holiday calendar lookup"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
