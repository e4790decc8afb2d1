use crate::{
    api::{attendance, holiday, leave_request, overtime},
    auth::middleware::auth_middleware,
    config::Config,
    error::HrisError,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_else(GovernorConfig::default);
    Governor::new(&cfg)
}

/// Body and query decoding failures answer with the same envelope as every other validation error.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| HrisError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|err, _req| HrisError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| HrisError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| HrisError::Validation(err.to_string()).into()),
    );
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .configure(extractor_configs)
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("").route(web::post().to(attendance::record_attendance)),
                    )
                    // /attendance/{employee_id}/{date}
                    .service(
                        web::resource("/{employee_id}/{attendance_date}")
                            .route(web::get().to(attendance::get_attendance)),
                    ),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(web::resource("").route(web::post().to(leave_request::submit_leave)))
                    // /leave/balance
                    .service(
                        web::resource("/balance")
                            .route(web::get().to(leave_request::leave_balance)),
                    )
                    // /leave/{leave_id}/deductions
                    .service(
                        web::resource("/{leave_id}/deductions")
                            .route(web::get().to(leave_request::leave_deductions)),
                    ),
            )
            .service(
                web::scope("/overtime")
                    .service(
                        web::resource("/approve")
                            .route(web::post().to(overtime::approve_overtime)),
                    )
                    .service(
                        web::resource("/multiplier/{date}")
                            .route(web::get().to(overtime::overtime_multiplier)),
                    ),
            )
            .service(web::resource("/holiday/{date}").route(web::get().to(holiday::get_holiday))),
    );
}

// API REQUEST
//  └─ Authorization: Bearer access_token (issued by the identity service)
//       └─ role gates: attendance writers, HR/Admin, self-service employees
