use std::future::{ready, Ready};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};
use crate::domain::models::auth::role::Role;
use crate::domain::models::token::token::AccessClaims;
use crate::errors::AppError;

/// 검증된 액세스 토큰에서 추출된 사용자 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 고유 ID
    pub user_id: String,

    pub role: Role,

    /// 토큰 발급 시점의 이메일 인증 여부
    pub is_verified: bool,
}

impl AuthenticatedUser {
    /// 여러 역할 중 하나라도 보유하고 있는지 확인
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

impl From<AccessClaims> for AuthenticatedUser {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.id,
            role: claims.role,
            is_verified: claims.is_verified,
        }
    }
}

/// 인터셉터 파이프라인이 요청마다 채워 나가는 컨텍스트
///
/// 파이프라인이 끝나면 request extensions에 저장되어 핸들러가 읽습니다.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub principal: Option<AuthenticatedUser>,
}

impl RequestContext {
    pub fn with_principal(principal: AuthenticatedUser) -> Self {
        Self { principal: Some(principal) }
    }
}

/// ActixWeb FromRequest trait 구현
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let principal = req
            .extensions()
            .get::<RequestContext>()
            .and_then(|ctx| ctx.principal.clone());

        match principal {
            Some(user) => ready(Ok(user)),
            None => ready(Err(
                AppError::AuthenticationError("User not authenticated.".to_string()).into()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "507f1f77bcf86cd799439011".to_string(),
            role: Role::Admin,
            is_verified: true,
        }
    }

    #[test]
    fn test_has_any_role() {
        let user = admin();

        assert!(user.has_any_role(&[Role::Manager, Role::Admin]));
        assert!(!user.has_any_role(&[Role::SuperAdmin]));
    }

    #[actix_web::test]
    async fn test_extractor_reads_context() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(RequestContext::with_principal(admin()));

        let user = AuthenticatedUser::extract(&req).await.unwrap();
        assert_eq!(user, admin());
    }

    #[actix_web::test]
    async fn test_extractor_rejects_missing_principal() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(RequestContext::default());

        let err = AuthenticatedUser::extract(&req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
