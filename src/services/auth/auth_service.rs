//! # 인증 서비스
//!
//! 회원가입, 로그인, 로그아웃, 이메일 인증, 비밀번호 변경/재설정의
//! 비즈니스 규칙을 구현합니다. 쿠키 처리는 핸들러 계층의 몫이며 이 모듈은
//! 발급된 토큰 값만 돌려줍니다.
//!
//! ## 검증 순서
//!
//! 각 작업은 아래 순서로 검사하며, 처음 실패한 단계의 메시지가 응답이 됩니다.
//!
//! ```text
//! register        : 필수 필드 → 이메일 형식 → 이름 길이 → 비밀번호 정책 → 확인 일치 → 중복(409)
//! login           : 필수 필드 → 이메일 형식 → 사용자(404) → 인증 여부(403) → 비밀번호(401)
//! change-password : 필수 필드 → 확인 일치 → 정책 → 사용자(404) → 기존 비밀번호(401)
//! reset-password  : 필수 필드 → 확인 일치 → 정책 → 토큰 → 사용자(404) → 지문
//! ```
//!
//! 로그인에서 인증 여부를 비밀번호보다 먼저 검사하므로, 미인증 계정은
//! 비밀번호가 맞든 틀리든 항상 403을 받습니다.

use std::sync::Arc;
use log::{info, warn};
use mongodb::bson::{oid::ObjectId, DateTime};
use validator::Validate;
use crate::domain::dto::users::request::validators::{check_password_policy, first_message, present};
use crate::domain::dto::users::request::{
    normalize_email, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest,
};
use crate::domain::entities::{RefreshToken, User, UserChanges};
use crate::domain::models::token::token::TokenPurpose;
use crate::errors::{AppError, AppResult};
use crate::repositories::{UserStore, EMAIL_TAKEN};
use super::password::PasswordHasher;
use super::token_service::TokenService;

/// 비밀번호 재설정 요청에 대한 고정 응답
///
/// 계정 존재 여부를 드러내지 않도록 항상 같은 문장을 돌려줍니다.
pub const FORGOT_PASSWORD_ACK: &str =
    "If an account with that email exists, a password reset link has been sent.";

const INVALID_ACTION_TOKEN: &str = "Invalid or expired token";

/// 회원가입 결과
#[derive(Debug, Clone)]
pub struct Registration {
    pub user: User,
    pub refresh_token: RefreshToken,
    /// 이메일 인증 링크에 들어가는 토큰
    pub verification_token: String,
}

/// 로그인 결과
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: RefreshToken,
}

/// 이메일 인증 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailVerification {
    Verified,
    AlreadyVerified,
}

impl EmailVerification {
    pub fn message(&self) -> &'static str {
        match self {
            EmailVerification::Verified => "Email verified successfully",
            EmailVerification::AlreadyVerified => "Email already verified",
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
    hasher: PasswordHasher,
    /// 인증/재설정 링크의 기준 URL
    base_url: String,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: TokenService,
        hasher: PasswordHasher,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// 새 계정 생성
    ///
    /// 계정은 미인증 상태로 만들어지며, 인증 링크는 로그로만 남깁니다.
    /// refresh token은 발급하지만 액세스 토큰은 발급하지 않습니다.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<Registration> {
        if !(present(&request.name)
            && present(&request.email)
            && present(&request.password)
            && present(&request.confirm_password))
        {
            return Err(AppError::ValidationError(
                "All fields are required, including confirm password".to_string(),
            ));
        }

        let request = request.normalized();
        request
            .validate()
            .map_err(|e| AppError::ValidationError(first_message(&e)))?;

        let (Some(name), Some(email), Some(password)) = (request.name, request.email, request.password) else {
            return Err(AppError::ValidationError(
                "All fields are required, including confirm password".to_string(),
            ));
        };

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::ConflictError(EMAIL_TAKEN.to_string()));
        }

        let password_hash = self.hasher.hash(&password).await?;
        let user = User::new(name, email, password_hash);
        self.users.insert(&user).await?;

        let verification_token = self.tokens
            .issue_action_token(&user.id, TokenPurpose::VerifyEmail, None)?;
        info!(
            "📧 이메일 인증 링크 생성: user={} link={}/auth/verify-email?token={}",
            user.id, self.base_url, verification_token
        );

        let refresh_token = self.tokens.issue_refresh_token(user.id).await?;
        info!("✅ 회원가입 완료: {}", user.email);

        Ok(Registration { user, refresh_token, verification_token })
    }

    /// 이메일/비밀번호 로그인
    ///
    /// 성공 시 기존 refresh token을 모두 지우고 새 세션을 만듭니다.
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginSession> {
        if !(present(&request.email) && present(&request.password)) {
            return Err(AppError::ValidationError("Email and password are required".to_string()));
        }

        request
            .validate()
            .map_err(|e| AppError::ValidationError(first_message(&e)))?;

        let email = normalize_email(request.email.as_deref().unwrap_or_default());
        let password = request.password.unwrap_or_default();

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                warn!("로그인 실패 - 존재하지 않는 이메일: {}", email);
                return Err(AppError::NotFound("User not found".to_string()));
            }
        };

        if !user.is_verified {
            warn!("로그인 거부 - 미인증 계정: {}", email);
            return Err(AppError::AuthorizationError(
                "Account not verified. Please verify your email first.".to_string(),
            ));
        }

        if !self.hasher.verify(&password, &user.password).await? {
            warn!("로그인 실패 - 비밀번호 불일치: {}", email);
            return Err(AppError::AuthenticationError("Invalid credentials".to_string()));
        }

        let changes = UserChanges {
            last_login: Some(DateTime::now()),
            ..Default::default()
        };
        let user = self.users
            .update(&user.id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.tokens.revoke_all_for_user(&user.id).await?;
        let refresh_token = self.tokens.issue_refresh_token(user.id).await?;
        let access_token = self.tokens.issue_access_token(&user)?;

        info!("🔑 로그인 성공: {}", user.email);
        Ok(LoginSession { user, access_token, refresh_token })
    }

    /// 로그아웃
    ///
    /// 제시된 refresh token 행만 삭제합니다. 같은 사용자의 다른 세션은 유지됩니다.
    /// 토큰이 없거나 알 수 없는 값이어도 성공으로 처리합니다.
    pub async fn logout(&self, presented: Option<&str>) -> AppResult<()> {
        let Some(presented) = presented.filter(|t| !t.is_empty()) else {
            return Ok(());
        };

        if self.tokens.revoke(presented).await? {
            info!("👋 로그아웃: refresh token 삭제");
        }

        Ok(())
    }

    /// 인증 링크의 토큰으로 계정을 인증 상태로 바꿉니다.
    ///
    /// 이미 인증된 계정은 변경 없이 `AlreadyVerified`를 돌려줍니다.
    pub async fn verify_email(&self, token: Option<&str>) -> AppResult<EmailVerification> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::ValidationError("Token is required".to_string()))?;

        let (user_id, _) = self.tokens.verify_action_token(token, TokenPurpose::VerifyEmail)?;

        let user = self.users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.is_verified {
            return Ok(EmailVerification::AlreadyVerified);
        }

        let changes = UserChanges {
            is_verified: Some(true),
            ..Default::default()
        };
        self.users
            .update(&user.id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        info!("✅ 이메일 인증 완료: {}", user.email);
        Ok(EmailVerification::Verified)
    }

    /// 로그인한 사용자의 비밀번호 변경
    ///
    /// 변경 후 모든 refresh token을 폐기합니다. 현재 액세스 토큰은 만료될
    /// 때까지 유효합니다.
    pub async fn change_password(&self, user_id: &str, request: ChangePasswordRequest) -> AppResult<()> {
        let (Some(old_password), Some(new_password), Some(confirm)) = (
            request.old_password.filter(|v| !v.is_empty()),
            request.new_password.filter(|v| !v.is_empty()),
            request.confirm_new_password.filter(|v| !v.is_empty()),
        ) else {
            return Err(AppError::ValidationError(
                "Old password, new password, and confirm new password are required".to_string(),
            ));
        };

        check_new_password(&new_password, &confirm)?;

        let user = self.find_user(user_id).await?;

        if !self.hasher.verify(&old_password, &user.password).await? {
            warn!("비밀번호 변경 거부 - 기존 비밀번호 불일치: user={}", user.id);
            return Err(AppError::AuthenticationError("Old password is incorrect".to_string()));
        }

        self.store_new_password(&user, &new_password).await?;
        info!("🔐 비밀번호 변경: user={}", user.id);
        Ok(())
    }

    /// 비밀번호 재설정 링크 발급
    ///
    /// 사용자가 있으면 발급된 토큰을 돌려주고, 없으면 `None`을 돌려줍니다.
    /// 응답 본문은 두 경우 모두 [`FORGOT_PASSWORD_ACK`]입니다.
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> AppResult<Option<String>> {
        let email = request
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::ValidationError("Email is required".to_string()))?;

        let Some(user) = self.users.find_by_email(&email).await? else {
            info!("비밀번호 재설정 요청 - 등록되지 않은 이메일");
            return Ok(None);
        };

        let fingerprint = PasswordHasher::fingerprint(&user.password);
        let token = self.tokens
            .issue_action_token(&user.id, TokenPurpose::ResetPassword, Some(fingerprint))?;

        info!(
            "📧 비밀번호 재설정 링크 생성: user={} link={}/auth/reset-password?token={}",
            user.id, self.base_url, token
        );
        Ok(Some(token))
    }

    /// 재설정 토큰으로 새 비밀번호 설정
    ///
    /// 토큰에는 발급 시점의 비밀번호 해시 지문이 들어 있어, 한 번 사용되면
    /// (또는 그 사이 비밀번호가 바뀌면) 같은 토큰은 거부됩니다.
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> AppResult<()> {
        let (Some(token), Some(new_password), Some(confirm)) = (
            request.token.filter(|v| !v.is_empty()),
            request.new_password.filter(|v| !v.is_empty()),
            request.confirm_new_password.filter(|v| !v.is_empty()),
        ) else {
            return Err(AppError::ValidationError(
                "Token, new password, and confirm new password are required".to_string(),
            ));
        };

        check_new_password(&new_password, &confirm)?;

        let (user_id, claims) = self.tokens.verify_action_token(&token, TokenPurpose::ResetPassword)?;

        let user = self.users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if claims.fp.as_deref() != Some(PasswordHasher::fingerprint(&user.password).as_str()) {
            warn!("비밀번호 재설정 거부 - 이미 사용되었거나 오래된 토큰: user={}", user.id);
            return Err(AppError::ValidationError(INVALID_ACTION_TOKEN.to_string()));
        }

        self.store_new_password(&user, &new_password).await?;
        info!("🔐 비밀번호 재설정: user={}", user.id);
        Ok(())
    }

    async fn find_user(&self, user_id: &str) -> AppResult<User> {
        let id = ObjectId::parse_str(user_id)
            .map_err(|_| AppError::NotFound("User not found".to_string()))?;

        self.users
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn store_new_password(&self, user: &User, new_password: &str) -> AppResult<()> {
        let changes = UserChanges {
            password: Some(self.hasher.hash(new_password).await?),
            ..Default::default()
        };

        self.users
            .update(&user.id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        self.tokens.revoke_all_for_user(&user.id).await?;
        Ok(())
    }
}

/// 새 비밀번호 확인 일치와 정책 검사
fn check_new_password(new_password: &str, confirm: &str) -> AppResult<()> {
    if new_password != confirm {
        return Err(AppError::ValidationError(
            "New password and confirm new password do not match".to_string(),
        ));
    }

    check_password_policy(new_password)
        .map_err(|issue| AppError::ValidationError(issue.message("New password")))
}
