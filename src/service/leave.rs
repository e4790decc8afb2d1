use crate::error::{HrisError, HrisResult};
use crate::model::leave_request::{LeaveReceipt, NewLeaveRequest};
use crate::repo::LeaveLedger;

/// Runs one leave submission through the ledger for the balance year `year`.
pub async fn submit_leave(
    ledger: &dyn LeaveLedger,
    request: &NewLeaveRequest,
    year: i32,
) -> HrisResult<LeaveReceipt> {
    match ledger.submit_leave(request, year).await {
        Ok(receipt) => {
            tracing::info!(
                employee_id = request.employee_id,
                leave_type_id = request.leave_type_id,
                leave_id = receipt.leave_id,
                total_days = request.total_days,
                leave_balance = receipt.leave_balance,
                "Leave request submitted"
            );
            if receipt.leave_balance < 0.0 {
                tracing::warn!(
                    employee_id = request.employee_id,
                    leave_type_id = request.leave_type_id,
                    leave_balance = receipt.leave_balance,
                    "Leave balance is overdrawn"
                );
            }
            Ok(receipt)
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                employee_id = request.employee_id,
                leave_type_id = request.leave_type_id,
                "Leave submission failed"
            );
            Err(match e {
                HrisError::Validation(_) | HrisError::LedgerRolledBack(_) => e,
                other => HrisError::LedgerRolledBack(other.to_string()),
            })
        }
    }
}
