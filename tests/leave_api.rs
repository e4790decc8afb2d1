#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use chrono::{Datelike, Local};
use common::{bearer, peer, token};
use hris::model::role::Role;
use hris::repo::LeaveLedger;
use hris::repo::memory::MemoryStore;
use serde_json::Value;
use std::sync::Arc;

fn this_year() -> i32 {
    Local::now().year()
}

fn store_with_balance(limit: f64, used: f64) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.set_leave_balance(1001, 2, this_year(), limit, used);
    store
}

const THREE_DAYS: [(&str, &str); 6] = [
    ("employee_id", "1001"),
    ("leave_type_id", "2"),
    ("date_from", "2025-07-01"),
    ("date_until", "2025-07-03"),
    ("total_days", "3"),
    ("reason", "Family trip"),
];

#[actix_web::test]
async fn test_submission_writes_request_balance_and_log() {
    let store = store_with_balance(15.0, 0.0);
    let app = test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/leave")
        .peer_addr(peer())
        .insert_header(bearer(&token(Role::Hr, None)))
        .set_form(THREE_DAYS)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Leave request submitted");
    assert_eq!(body["leave_balance"], 12.0);

    let balance = store.leave_balance(1001, 2, this_year()).await.unwrap().unwrap();
    assert_eq!(balance.leave_used, 3.0);
    assert_eq!(balance.leave_balance, 12.0);
    assert_eq!(store.leave_requests().len(), 1);
    assert_eq!(store.leave_requests()[0].status, "Pending");

    let logs = store.deduction_logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].deducted_days, 3.0);
    assert_eq!(logs[0].leave_id, body["leave_id"].as_u64().unwrap());
}

#[actix_web::test]
async fn test_log_failure_rolls_back_the_whole_submission() {
    let store = store_with_balance(15.0, 0.0);
    store.fail_deduction_log_inserts(true);
    let app = test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/leave")
        .peer_addr(peer())
        .insert_header(bearer(&token(Role::Hr, None)))
        .set_form(THREE_DAYS)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Server error: "));

    assert!(store.leave_requests().is_empty());
    assert!(store.deduction_logs().is_empty());
    let balance = store.leave_balance(1001, 2, this_year()).await.unwrap().unwrap();
    assert_eq!(balance.leave_used, 0.0);
    assert_eq!(balance.leave_balance, 15.0);
}

#[actix_web::test]
async fn test_missing_balance_row_rolls_back() {
    let store = Arc::new(MemoryStore::new());
    let app = test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/leave")
        .peer_addr(peer())
        .insert_header(bearer(&token(Role::Admin, None)))
        .set_form(THREE_DAYS)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(store.leave_requests().is_empty());
}

#[actix_web::test]
async fn test_exhausted_balance_goes_negative() {
    let store = store_with_balance(2.0, 2.0);
    let app = test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/leave")
        .peer_addr(peer())
        .insert_header(bearer(&token(Role::Hr, None)))
        .set_form([
            ("employee_id", "1001"),
            ("leave_type_id", "2"),
            ("date_from", "2025-08-04"),
            ("date_until", "2025-08-04"),
            ("total_days", "1"),
            ("reason", ""),
        ])
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["leave_balance"], -1.0);
}

#[actix_web::test]
async fn test_missing_leave_type_is_a_validation_error() {
    let store = store_with_balance(15.0, 0.0);
    let app = test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/leave")
        .peer_addr(peer())
        .insert_header(bearer(&token(Role::Hr, None)))
        .set_form([
            ("employee_id", "1001"),
            ("date_from", "2025-07-01"),
            ("date_until", "2025-07-03"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "leave_type_id is required");
    assert!(store.leave_requests().is_empty());
}

#[actix_web::test]
async fn test_employee_submits_only_for_self() {
    let store = store_with_balance(15.0, 0.0);
    let app = test_app!(store);

    let own = test::TestRequest::post()
        .uri("/api/leave")
        .peer_addr(peer())
        .insert_header(bearer(&token(Role::Employee, Some(1001))))
        .set_form(THREE_DAYS)
        .to_request();
    assert_eq!(test::call_service(&app, own).await.status(), StatusCode::OK);

    let other = test::TestRequest::post()
        .uri("/api/leave")
        .peer_addr(peer())
        .insert_header(bearer(&token(Role::Employee, Some(4004))))
        .set_form(THREE_DAYS)
        .to_request();
    assert_eq!(
        test::call_service(&app, other).await.status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(store.leave_requests().len(), 1);
}

#[actix_web::test]
async fn test_balance_and_deductions_can_be_read_back() {
    let store = store_with_balance(15.0, 0.0);
    let app = test_app!(store);

    let submit = test::TestRequest::post()
        .uri("/api/leave")
        .peer_addr(peer())
        .insert_header(bearer(&token(Role::Hr, None)))
        .set_form(THREE_DAYS)
        .to_request();
    let submitted: Value = test::call_and_read_body_json(&app, submit).await;
    let leave_id = submitted["leave_id"].as_u64().unwrap();

    let balance = test::TestRequest::get()
        .uri(&format!(
            "/api/leave/balance?employee_id=1001&leave_type_id=2&year={}",
            this_year()
        ))
        .peer_addr(peer())
        .insert_header(bearer(&token(Role::Employee, Some(1001))))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, balance).await;
    assert_eq!(body["leave_used"], 3.0);
    assert_eq!(body["leave_balance"], 12.0);

    let deductions = test::TestRequest::get()
        .uri(&format!("/api/leave/{leave_id}/deductions"))
        .peer_addr(peer())
        .insert_header(bearer(&token(Role::Hr, None)))
        .to_request();
    let rows: Value = test::call_and_read_body_json(&app, deductions).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["deducted_days"], 3.0);

    let other_year = test::TestRequest::get()
        .uri("/api/leave/balance?employee_id=1001&leave_type_id=2&year=1999")
        .peer_addr(peer())
        .insert_header(bearer(&token(Role::Hr, None)))
        .to_request();
    assert_eq!(
        test::call_service(&app, other_year).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_employee_for_someone_else_is_forbidden_before_field_checks() {
    let store = store_with_balance(15.0, 0.0);
    let app = test_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/leave")
        .peer_addr(peer())
        .insert_header(bearer(&token(Role::Employee, Some(4004))))
        .set_form([("employee_id", "1001"), ("date_from", "2025-07-01")])
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );
    assert!(store.leave_requests().is_empty());
}
