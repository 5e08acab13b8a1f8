//! 파이프라인에 넣는 인증/인가 단계
//!
//! | 인터셉터 | 사용처 | 실패 |
//! |---|---|---|
//! | [`CookieAuthenticator`] | 인증 서비스 | 401 |
//! | [`BearerAuthenticator`] | 게이트웨이 | 401 |
//! | [`RequireVerified`] | 인증 서비스 | 401 / 403 |
//! | [`RoleGate`] | 공통 | 401 / 403 |

use actix_web::dev::ServiceRequest;
use actix_web::http::header::AUTHORIZATION;
use crate::domain::models::auth::authenticated_user::{AuthenticatedUser, RequestContext};
use crate::domain::models::auth::role::Role;
use crate::errors::AppError;
use crate::services::auth::jwt::{extract_bearer_token, JwtCodec};
use super::pipeline::{Interceptor, Outcome};

/// 액세스 토큰 쿠키 이름
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// `access_token` 쿠키로 사용자를 식별합니다.
pub struct CookieAuthenticator {
    codec: JwtCodec,
}

impl CookieAuthenticator {
    pub fn new(codec: JwtCodec) -> Self {
        Self { codec }
    }
}

impl Interceptor for CookieAuthenticator {
    fn intercept(&self, req: &ServiceRequest, ctx: RequestContext) -> Outcome {
        let Some(cookie) = req.cookie(ACCESS_TOKEN_COOKIE) else {
            return Outcome::Reject(AppError::AuthenticationError(
                "Access denied. No token provided.".to_string(),
            ));
        };

        match self.codec.decode_access(cookie.value()) {
            Ok(claims) => Outcome::Continue(authenticated(ctx, claims.into())),
            Err(e) => {
                log::debug!("쿠키 토큰 검증 실패: {}", e);
                Outcome::Reject(AppError::AuthenticationError("Invalid or expired token.".to_string()))
            }
        }
    }
}

/// `Authorization: Bearer` 헤더로 사용자를 식별합니다.
pub struct BearerAuthenticator {
    codec: JwtCodec,
}

impl BearerAuthenticator {
    pub fn new(codec: JwtCodec) -> Self {
        Self { codec }
    }
}

impl Interceptor for BearerAuthenticator {
    fn intercept(&self, req: &ServiceRequest, ctx: RequestContext) -> Outcome {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(extract_bearer_token);

        let Some(token) = token else {
            return Outcome::Reject(AppError::AuthenticationError(
                "Unauthorized: No token provided".to_string(),
            ));
        };

        match self.codec.decode_access(token) {
            Ok(claims) => Outcome::Continue(authenticated(ctx, claims.into())),
            Err(e) => {
                log::warn!("게이트웨이 토큰 검증 실패: {} {}", req.path(), e);
                Outcome::Reject(AppError::AuthenticationError("Unauthorized: Invalid token".to_string()))
            }
        }
    }
}

fn authenticated(mut ctx: RequestContext, user: AuthenticatedUser) -> RequestContext {
    ctx.principal = Some(user);
    ctx
}

/// 이메일 인증을 마친 사용자만 통과시킵니다.
///
/// 토큰에 담긴 `isVerified` 값을 사용하므로, 인증 직후에는 다시 로그인하거나
/// 토큰을 갱신해야 통과합니다.
pub struct RequireVerified;

impl Interceptor for RequireVerified {
    fn intercept(&self, _req: &ServiceRequest, ctx: RequestContext) -> Outcome {
        match &ctx.principal {
            None => Outcome::Reject(AppError::AuthenticationError("User not authenticated.".to_string())),
            Some(user) if !user.is_verified => Outcome::Reject(AppError::AuthorizationError(
                "Account not verified. Please verify your email first.".to_string(),
            )),
            Some(_) => Outcome::Continue(ctx),
        }
    }
}

/// 역할 허용 목록 검사
pub struct RoleGate {
    allowed: Vec<Role>,
    denied_message: &'static str,
}

impl RoleGate {
    /// 목록 중 하나의 역할이면 통과
    pub fn authorize_roles(roles: &[Role]) -> Self {
        Self {
            allowed: roles.to_vec(),
            denied_message: "Access denied: insufficient privileges.",
        }
    }

    /// 정확히 한 역할만 통과
    pub fn require_role(role: Role) -> Self {
        Self {
            allowed: vec![role],
            denied_message: "Access denied. Insufficient permissions.",
        }
    }

    /// 거부 메시지 교체 (게이트웨이 응답 문구)
    pub fn with_message(mut self, message: &'static str) -> Self {
        self.denied_message = message;
        self
    }
}

impl Interceptor for RoleGate {
    fn intercept(&self, req: &ServiceRequest, ctx: RequestContext) -> Outcome {
        let Some(user) = &ctx.principal else {
            return Outcome::Reject(AppError::AuthenticationError("User not authenticated.".to_string()));
        };

        if user.has_any_role(&self.allowed) {
            Outcome::Continue(ctx)
        } else {
            log::warn!(
                "권한 부족: user={} role={} path={} allowed={:?}",
                user.user_id, user.role, req.path(), self.allowed
            );
            Outcome::Reject(AppError::AuthorizationError(self.denied_message.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;
    use chrono::Duration;

    const USER_ID: &str = "507f1f77bcf86cd799439011";

    fn codec() -> JwtCodec {
        JwtCodec::new("test_secret")
    }

    fn principal(role: Role, is_verified: bool) -> RequestContext {
        RequestContext::with_principal(AuthenticatedUser {
            user_id: USER_ID.into(),
            role,
            is_verified,
        })
    }

    fn rejected_with(outcome: Outcome) -> AppError {
        match outcome {
            Outcome::Reject(err) => err,
            Outcome::Continue(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_cookie_authenticator() {
        let auth = CookieAuthenticator::new(codec());
        let token = codec().encode_access(USER_ID, Role::User, true, Duration::days(1)).unwrap();

        let req = TestRequest::default()
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, token))
            .to_srv_request();
        match auth.intercept(&req, RequestContext::default()) {
            Outcome::Continue(ctx) => assert_eq!(ctx.principal.unwrap().user_id, USER_ID),
            Outcome::Reject(e) => panic!("unexpected rejection: {}", e),
        }

        let req = TestRequest::default().to_srv_request();
        let err = rejected_with(auth.intercept(&req, RequestContext::default()));
        assert_eq!(err.to_string(), "Authentication error: Access denied. No token provided.");

        let req = TestRequest::default()
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "garbage"))
            .to_srv_request();
        let err = rejected_with(auth.intercept(&req, RequestContext::default()));
        assert_eq!(err.to_string(), "Authentication error: Invalid or expired token.");
    }

    #[test]
    fn test_bearer_authenticator() {
        let auth = BearerAuthenticator::new(codec());
        let token = codec().encode_access(USER_ID, Role::Admin, true, Duration::days(1)).unwrap();

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_srv_request();
        assert!(matches!(auth.intercept(&req, RequestContext::default()), Outcome::Continue(_)));

        let req = TestRequest::default().to_srv_request();
        let err = rejected_with(auth.intercept(&req, RequestContext::default()));
        assert!(matches!(err, AppError::AuthenticationError(ref m) if m == "Unauthorized: No token provided"));

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer not.a.jwt"))
            .to_srv_request();
        let err = rejected_with(auth.intercept(&req, RequestContext::default()));
        assert!(matches!(err, AppError::AuthenticationError(ref m) if m == "Unauthorized: Invalid token"));
    }

    #[test]
    fn test_require_verified() {
        let req = TestRequest::default().to_srv_request();

        assert!(matches!(
            RequireVerified.intercept(&req, principal(Role::User, true)),
            Outcome::Continue(_)
        ));
        assert!(matches!(
            rejected_with(RequireVerified.intercept(&req, principal(Role::User, false))),
            AppError::AuthorizationError(_)
        ));
        assert!(matches!(
            rejected_with(RequireVerified.intercept(&req, RequestContext::default())),
            AppError::AuthenticationError(_)
        ));
    }

    #[test]
    fn test_role_gate() {
        let req = TestRequest::default().to_srv_request();
        let gate = RoleGate::authorize_roles(&[Role::Admin, Role::SuperAdmin]);

        assert!(matches!(gate.intercept(&req, principal(Role::Admin, true)), Outcome::Continue(_)));

        let err = rejected_with(gate.intercept(&req, principal(Role::User, true)));
        assert!(matches!(err, AppError::AuthorizationError(ref m) if m == "Access denied: insufficient privileges."));

        let err = rejected_with(gate.intercept(&req, RequestContext::default()));
        assert!(matches!(err, AppError::AuthenticationError(_)));

        let gate = RoleGate::require_role(Role::SuperAdmin).with_message("Forbidden");
        let err = rejected_with(gate.intercept(&req, principal(Role::Admin, true)));
        assert!(matches!(err, AppError::AuthorizationError(ref m) if m == "Forbidden"));
    }
}
