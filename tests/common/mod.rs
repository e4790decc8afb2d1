#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime, Utc};
use hris::auth::jwt::sign_token;
use hris::config::Config;
use hris::model::role::Role;
use hris::model::shift::{BreakWindow, Shift, ShiftSchedule};
use hris::models::{Claims, TokenType};
use hris::repo::memory::MemoryStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

pub const SECRET: &str = "integration-secret";

pub fn config() -> Config {
    Config {
        database_url: "mysql://unused".to_string(),
        jwt_secret: SECRET.to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        db_max_connections: 1,
        rate_protected_per_min: 1000,
        api_prefix: "/api".to_string(),
        reference_cache_ttl: Duration::from_secs(60),
        log_dir: "logs".to_string(),
    }
}

pub fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

pub fn token(role: Role, employee_id: Option<u64>) -> String {
    token_of_type(role, employee_id, TokenType::Access)
}

pub fn token_of_type(role: Role, employee_id: Option<u64>, token_type: TokenType) -> String {
    let claims = Claims {
        user_id: 77,
        sub: "integration".to_string(),
        role: role as u8,
        exp: (Utc::now().timestamp() + 3600) as usize,
        jti: "integration-jti".to_string(),
        token_type,
        employee_id,
    };
    sign_token(&claims, SECRET).unwrap()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// 09:00-18:00, 540 minutes with an unpaid 12:00-13:00 break.
pub fn nine_to_six() -> ShiftSchedule {
    ShiftSchedule {
        shift: Shift {
            id: 1,
            start_time: time(9, 0),
            end_time: time(18, 0),
            total_minutes: 540,
        },
        breaks: vec![BreakWindow {
            id: 1,
            shift_id: 1,
            break_start: time(12, 0),
            break_end: time(13, 0),
            break_minutes: 60,
        }],
    }
}

/// Store with employee 1001 on the 09:00-18:00 shift since 2025-01-01.
pub fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.add_shift(nine_to_six());
    store.assign_shift(1001, 1, date(2025, 1, 1), None);
    store
}

/// Builds the full route tree over `$store` with the same wiring as the server binary.
macro_rules! test_app {
    ($store:expr) => {{
        let config = $crate::common::config();
        let state = hris::state::AppState::from_store($store.clone());
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::NormalizePath::trim())
                .app_data(actix_web::web::Data::new(config.clone()))
                .app_data(actix_web::web::Data::new(state))
                .configure(move |cfg| hris::routes::configure(cfg, config)),
        )
        .await
    }};
}
