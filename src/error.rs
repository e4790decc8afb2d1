//! Error types for the attendance and leave services.
//!
//! Every failure a request can hit maps onto one [`HrisError`] variant, and
//! every variant renders the same `{ "success": false, "message": ... }`
//! envelope. Storage and ledger failures never echo the underlying database
//! message back to the caller; handlers log it with `tracing` instead.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HrisError {
    /// A required field was missing or malformed. Detected before any write.
    #[error("{0}")]
    Validation(String),

    /// No shift is assigned to the employee on that date.
    #[error("No shift assigned for employee {employee_id} on {date}")]
    NoShiftAssigned { employee_id: u64, date: NaiveDate },

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    /// One of the leave ledger writes failed and the whole submission was rolled back.
    #[error("Leave submission rolled back: {0}")]
    LedgerRolledBack(String),
}

pub type HrisResult<T> = Result<T, HrisError>;

impl HrisError {
    /// Failures whose detail belongs in the server log rather than the response.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            HrisError::Database(_) | HrisError::Storage(_) | HrisError::LedgerRolledBack(_)
        )
    }

    /// The message that is safe to show to API consumers.
    pub fn public_message(&self) -> String {
        match self {
            HrisError::Validation(msg) | HrisError::NotFound(msg) => msg.clone(),
            HrisError::NoShiftAssigned { .. } => self.to_string(),
            HrisError::Database(_) | HrisError::Storage(_) => "Internal Server Error".to_string(),
            HrisError::LedgerRolledBack(_) => {
                "Server error: leave request could not be completed".to_string()
            }
        }
    }
}

impl ResponseError for HrisError {
    fn status_code(&self) -> StatusCode {
        match self {
            HrisError::Validation(_) => StatusCode::BAD_REQUEST,
            HrisError::NoShiftAssigned { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            HrisError::NotFound(_) => StatusCode::NOT_FOUND,
            HrisError::Database(_) | HrisError::Storage(_) | HrisError::LedgerRolledBack(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": self.public_message()
        }))
    }
}
