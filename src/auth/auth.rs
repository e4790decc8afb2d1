use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::model::role::Role;
use crate::models::TokenType;
use actix_web::error::{ErrorForbidden, ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web::Data};
use futures::future::{Ready, ready};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Normally set by the auth middleware on the protected scope.
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let Some(token) = bearer_token(req) else {
            return ready(Err(ErrorUnauthorized("Missing token")));
        };

        let Some(config) = req.app_data::<Data<Config>>() else {
            return ready(Err(ErrorInternalServerError("Config missing")));
        };

        let claims = match verify_token(token, &config.jwt_secret) {
            Ok(c) => c,
            Err(_) => return ready(Err(ErrorUnauthorized("Invalid token"))),
        };

        if claims.token_type != TokenType::Access {
            return ready(Err(ErrorUnauthorized("Access token required")));
        }

        match AuthUser::from_claims(claims) {
            Some(user) => ready(Ok(user)),
            None => ready(Err(ErrorUnauthorized("Invalid role"))),
        }
    }
}

impl AuthUser {
    pub fn from_claims(claims: crate::models::Claims) -> Option<Self> {
        let role = Role::from_id(claims.role)?;
        Some(AuthUser {
            user_id: claims.user_id,
            username: claims.sub,
            role,
            employee_id: claims.employee_id,
        })
    }

    pub fn require_hr_or_admin(&self) -> actix_web::Result<()> {
        if matches!(self.role, Role::Admin | Role::Hr) {
            Ok(())
        } else {
            Err(ErrorForbidden("HR/Admin only"))
        }
    }

    /// HR staff, admins and import accounts may post punches for anyone.
    pub fn require_attendance_writer(&self) -> actix_web::Result<()> {
        if self.role.can_record_attendance() {
            Ok(())
        } else {
            Err(ErrorForbidden("Not allowed to record attendance"))
        }
    }

    /// Employees may only act on their own record; every other role may act on anyone.
    pub fn require_self_or_staff(&self, employee_id: u64) -> actix_web::Result<()> {
        if !self.is_employee() || self.employee_id == Some(employee_id) {
            Ok(())
        } else {
            Err(ErrorForbidden("Employees may only submit their own requests"))
        }
    }

    /// Returns true if the user is an employee
    pub fn is_employee(&self) -> bool {
        self.role == Role::Employee
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, employee_id: Option<u64>) -> AuthUser {
        AuthUser {
            user_id: 1,
            username: "tester".to_string(),
            role,
            employee_id,
        }
    }

    #[test]
    fn test_hr_gate() {
        assert!(user(Role::Admin, None).require_hr_or_admin().is_ok());
        assert!(user(Role::Hr, None).require_hr_or_admin().is_ok());
        assert!(user(Role::System, None).require_hr_or_admin().is_err());
        assert!(user(Role::Employee, Some(10)).require_hr_or_admin().is_err());
    }

    #[test]
    fn test_attendance_writer_gate() {
        assert!(user(Role::ApiUser, None).require_attendance_writer().is_ok());
        assert!(user(Role::Employee, Some(10)).require_attendance_writer().is_err());
    }

    #[test]
    fn test_employee_acts_only_on_self() {
        let employee = user(Role::Employee, Some(10));
        assert!(employee.require_self_or_staff(10).is_ok());
        assert!(employee.require_self_or_staff(11).is_err());
        assert!(user(Role::Employee, None).require_self_or_staff(10).is_err());
        assert!(user(Role::Hr, None).require_self_or_staff(11).is_ok());
    }

    fn config() -> Config {
        Config {
            database_url: "mysql://unused".to_string(),
            jwt_secret: "extractor-secret".to_string(),
            server_addr: "127.0.0.1:0".to_string(),
            db_max_connections: 1,
            rate_protected_per_min: 10,
            api_prefix: "/api".to_string(),
            reference_cache_ttl: std::time::Duration::from_secs(1),
            log_dir: "logs".to_string(),
        }
    }

    async fn extract_with(token_type: TokenType) -> actix_web::Result<AuthUser> {
        let claims = crate::models::Claims {
            user_id: 3,
            sub: "hr.officer".to_string(),
            role: Role::Hr as u8,
            exp: (chrono::Utc::now().timestamp() + 600) as usize,
            jti: "extractor-jti".to_string(),
            token_type,
            employee_id: None,
        };
        let token = crate::auth::jwt::sign_token(&claims, "extractor-secret").unwrap();
        let req = actix_web::test::TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {token}")))
            .app_data(Data::new(config()))
            .to_http_request();
        AuthUser::extract(&req).await
    }

    #[actix_web::test]
    async fn test_extractor_accepts_access_token_without_middleware() {
        let user = extract_with(TokenType::Access).await.unwrap();
        assert_eq!(user.role, Role::Hr);
    }

    #[actix_web::test]
    async fn test_extractor_rejects_refresh_token() {
        let err = extract_with(TokenType::Refresh).await.unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            actix_web::http::StatusCode::UNAUTHORIZED
        );
    }
}
