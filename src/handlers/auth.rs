//! Authentication HTTP Handlers
//!
//! `/auth` 아래의 세션 엔드포인트입니다. 토큰은 모두 HttpOnly 쿠키로 전달되며
//! 응답 본문에는 토큰 값을 싣지 않습니다.
//!
//! | Method | Path | 인증 |
//! |---|---|---|
//! | POST | `/auth/register` | - |
//! | POST | `/auth/login` | - (로그인 제한기) |
//! | POST | `/auth/logout` | refresh 쿠키 (선택) |
//! | GET | `/auth/verify` | access 쿠키 |
//! | POST | `/auth/refresh` | refresh 쿠키 |
//! | GET | `/auth/verify-email` | `?token=` |
//! | PUT | `/auth/change-password` | access 쿠키 + 이메일 인증 |
//! | POST | `/auth/forgot-password` | - |
//! | POST | `/auth/reset-password` | 재설정 토큰 |

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use crate::core::AppState;
use crate::domain::dto::users::request::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    VerifyEmailQuery,
};
use crate::domain::dto::users::response::UserResponse;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::errors::AppError;
use crate::middlewares::ACCESS_TOKEN_COOKIE;
use crate::services::auth::FORGOT_PASSWORD_ACK;
use super::cookies::{access_cookie, refresh_cookie, removal_cookie, REFRESH_TOKEN_COOKIE};

pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let registration = state.auth.register(payload.into_inner()).await?;

    Ok(HttpResponse::Created()
        .cookie(refresh_cookie(&registration.refresh_token, &state.config))
        .json(json!({
            "message": "User registered successfully. Please verify your email.",
            "user": UserResponse::from(&registration.user),
        })))
}

pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let session = state.auth.login(payload.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .cookie(access_cookie(session.access_token, &state.config))
        .cookie(refresh_cookie(&session.refresh_token, &state.config))
        .json(json!({
            "message": "Login successful",
            "user": UserResponse::from(&session.user),
        })))
}

/// 세션 종료
///
/// refresh 쿠키가 없거나 이미 무효여도 쿠키를 지우고 200을 돌려줍니다.
pub async fn logout(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let presented = req.cookie(REFRESH_TOKEN_COOKIE);
    state.auth.logout(presented.as_ref().map(|c| c.value())).await?;

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(ACCESS_TOKEN_COOKIE, &state.config))
        .cookie(removal_cookie(REFRESH_TOKEN_COOKIE, &state.config))
        .json(json!({ "message": "Logged out successfully" })))
}

/// 액세스 토큰 쿠키 검증
///
/// 실패 시에도 `{valid:false}` 형태를 유지하므로 파이프라인 대신 직접 검사합니다.
pub async fn verify(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let Some(cookie) = req.cookie(ACCESS_TOKEN_COOKIE) else {
        return HttpResponse::Unauthorized().json(json!({ "valid": false, "error": "No token" }));
    };

    match state.tokens.verify_access_token(cookie.value()) {
        Some(claims) => HttpResponse::Ok().json(json!({ "valid": true, "user": claims })),
        None => HttpResponse::Unauthorized().json(json!({ "valid": false, "error": "Invalid token" })),
    }
}

pub async fn refresh(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let presented = req.cookie(REFRESH_TOKEN_COOKIE);
    let access_token = state.tokens.refresh(presented.as_ref().map(|c| c.value())).await?;

    Ok(HttpResponse::Ok()
        .cookie(access_cookie(access_token, &state.config))
        .json(json!({ "message": "Access token refreshed" })))
}

pub async fn verify_email(
    state: web::Data<AppState>,
    query: web::Query<VerifyEmailQuery>,
) -> Result<HttpResponse, AppError> {
    let outcome = state.auth.verify_email(query.token.as_deref()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": outcome.message() })))
}

pub async fn change_password(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    state.auth.change_password(&user.user_id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Password changed successfully" })))
}

pub async fn forgot_password(
    state: web::Data<AppState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    // 발급된 토큰은 링크로만 전달되고 응답에는 싣지 않음
    let _ = state.auth.forgot_password(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": FORGOT_PASSWORD_ACK })))
}

pub async fn reset_password(
    state: web::Data<AppState>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    state.auth.reset_password(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Password has been reset successfully" })))
}
