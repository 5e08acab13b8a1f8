//! # 토큰 / 세션 서비스
//!
//! 액세스 토큰(JWT)과 refresh token(저장소 행) 발급, 검증, 폐기를 담당합니다.
//!
//! ```text
//! login ──► issue_refresh_token ──► refreshtokens 행 생성
//!       └─► issue_access_token  ──► JWT {id, role, isVerified}
//!
//! refresh(cookie) ──► 행 조회 ──► 만료 검사 ──► 사용자 조회 ──► 새 액세스 토큰
//! ```
//!
//! 한 사용자가 여러 refresh token을 가질 수 있으며, 로그인/비밀번호 변경 시
//! 해당 사용자의 모든 행을 지웁니다.

use std::sync::Arc;
use mongodb::bson::oid::ObjectId;
use crate::config::JwtConfig;
use crate::domain::entities::{RefreshToken, User};
use crate::domain::models::token::token::{AccessClaims, ActionClaims, TokenPurpose};
use crate::errors::{AppError, AppResult};
use crate::repositories::{RefreshTokenStore, UserStore};
use super::jwt::JwtCodec;

#[derive(Clone)]
pub struct TokenService {
    codec: JwtCodec,
    config: JwtConfig,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    users: Arc<dyn UserStore>,
}

impl TokenService {
    pub fn new(
        config: JwtConfig,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            codec: JwtCodec::new(&config.secret),
            config,
            refresh_tokens,
            users,
        }
    }

    pub fn codec(&self) -> &JwtCodec {
        &self.codec
    }

    /// 사용자 현재 상태로 액세스 토큰 발급
    pub fn issue_access_token(&self, user: &User) -> AppResult<String> {
        self.codec.encode_access(
            &user.id_string(),
            user.role,
            user.is_verified,
            self.config.access_ttl(),
        )
    }

    /// 새 refresh token 행을 저장하고 반환합니다.
    pub async fn issue_refresh_token(&self, user_id: ObjectId) -> AppResult<RefreshToken> {
        let token = RefreshToken::issue(user_id, self.config.refresh_ttl());
        self.refresh_tokens.insert(&token).await?;

        log::debug!("Refresh token 발급: user={}", user_id);
        Ok(token)
    }

    /// 액세스 토큰 검증
    ///
    /// 실패 사유는 호출자에게 노출하지 않고 `None`으로만 알립니다.
    pub fn verify_access_token(&self, token: &str) -> Option<AccessClaims> {
        match self.codec.decode_access(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                log::debug!("액세스 토큰 검증 실패: {}", e);
                None
            }
        }
    }

    /// refresh token으로 새 액세스 토큰 발급
    ///
    /// refresh token 자체는 회전하지 않습니다.
    ///
    /// # Errors
    ///
    /// * 토큰 없음 - `AuthenticationError` (401)
    /// * 저장소에 없거나 만료 - `AuthorizationError` (403)
    /// * 사용자 삭제됨 - `NotFound` (404)
    pub async fn refresh(&self, presented: Option<&str>) -> AppResult<String> {
        let presented = presented
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::AuthenticationError("No refresh token".to_string()))?;

        let stored = self.refresh_tokens
            .find_by_token(presented)
            .await?
            .ok_or_else(|| AppError::AuthorizationError("Invalid or expired refresh token".to_string()))?;

        if stored.is_expired() {
            // TTL 인덱스가 지우기 전의 행
            self.refresh_tokens.delete_by_token(&stored.token).await?;
            return Err(AppError::AuthorizationError("Invalid or expired refresh token".to_string()));
        }

        let user = self.users
            .find_by_id(&stored.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.issue_access_token(&user)
    }

    pub async fn revoke(&self, presented: &str) -> AppResult<bool> {
        self.refresh_tokens.delete_by_token(presented).await
    }

    /// 사용자의 모든 세션 폐기
    pub async fn revoke_all_for_user(&self, user_id: &ObjectId) -> AppResult<u64> {
        let removed = self.refresh_tokens.delete_all_for_user(user_id).await?;
        if removed > 0 {
            log::info!("🔒 Refresh token {}개 폐기: user={}", removed, user_id);
        }
        Ok(removed)
    }

    /// 이메일 인증 / 비밀번호 재설정용 서명 토큰 발급
    pub fn issue_action_token(
        &self,
        user_id: &ObjectId,
        purpose: TokenPurpose,
        fingerprint: Option<String>,
    ) -> AppResult<String> {
        let ttl = match purpose {
            TokenPurpose::VerifyEmail => self.config.email_token_ttl(),
            TokenPurpose::ResetPassword => self.config.reset_token_ttl(),
        };

        self.codec.encode_action(&user_id.to_hex(), purpose, fingerprint, ttl)
    }

    /// 작업 토큰을 검증하고 대상 사용자 ID를 돌려줍니다.
    pub fn verify_action_token(
        &self,
        token: &str,
        purpose: TokenPurpose,
    ) -> AppResult<(ObjectId, ActionClaims)> {
        let claims = self.codec.decode_action(token, purpose)?;
        let user_id = ObjectId::parse_str(&claims.id)
            .map_err(|_| AppError::ValidationError("Invalid or expired token".to_string()))?;

        Ok((user_id, claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::config::AppConfig;
    use crate::repositories::{InMemoryRefreshTokenStore, InMemoryUserStore};

    struct Fixture {
        service: TokenService,
        users: Arc<InMemoryUserStore>,
        tokens: Arc<InMemoryRefreshTokenStore>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserStore::default());
        let tokens = Arc::new(InMemoryRefreshTokenStore::default());
        let service = TokenService::new(
            AppConfig::for_tests().jwt,
            tokens.clone(),
            users.clone(),
        );
        Fixture { service, users, tokens }
    }

    async fn saved_user(f: &Fixture) -> User {
        let user = User::new("Alice".into(), "alice@example.com".into(), "hash".into());
        f.users.insert(&user).await.unwrap();
        user
    }

    #[actix_web::test]
    async fn test_refresh_issues_access_token_for_current_user_state() {
        let f = fixture();
        let user = saved_user(&f).await;
        let refresh = f.service.issue_refresh_token(user.id).await.unwrap();

        let access = f.service.refresh(Some(&refresh.token)).await.unwrap();
        let claims = f.service.verify_access_token(&access).unwrap();

        assert_eq!(claims.id, user.id_string());
        assert!(!claims.is_verified);
    }

    #[actix_web::test]
    async fn test_refresh_error_statuses() {
        let f = fixture();

        assert!(matches!(f.service.refresh(None).await, Err(AppError::AuthenticationError(_))));
        assert!(matches!(
            f.service.refresh(Some("unknown")).await,
            Err(AppError::AuthorizationError(_))
        ));

        // 사용자가 삭제된 뒤의 토큰
        let orphan = f.service.issue_refresh_token(ObjectId::new()).await.unwrap();
        assert!(matches!(
            f.service.refresh(Some(&orphan.token)).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn test_expired_refresh_token_is_removed() {
        let f = fixture();
        let user = saved_user(&f).await;
        let expired = RefreshToken::issue(user.id, Duration::seconds(-5));
        f.tokens.insert(&expired).await.unwrap();

        let result = f.service.refresh(Some(&expired.token)).await;

        assert!(matches!(result, Err(AppError::AuthorizationError(_))));
        assert!(f.tokens.find_by_token(&expired.token).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_revoke_all_for_user() {
        let f = fixture();
        let user = saved_user(&f).await;
        f.service.issue_refresh_token(user.id).await.unwrap();
        f.service.issue_refresh_token(user.id).await.unwrap();

        assert_eq!(f.service.revoke_all_for_user(&user.id).await.unwrap(), 2);
        assert_eq!(f.tokens.count_for_user(&user.id), 0);
    }

    #[test]
    fn test_action_token_roundtrip_keeps_user_id() {
        let f = fixture();
        let user_id = ObjectId::new();
        let token = f.service
            .issue_action_token(&user_id, TokenPurpose::ResetPassword, Some("fp".into()))
            .unwrap();

        let (parsed, claims) = f.service
            .verify_action_token(&token, TokenPurpose::ResetPassword)
            .unwrap();
        assert_eq!(parsed, user_id);
        assert_eq!(claims.fp.as_deref(), Some("fp"));
    }
}
