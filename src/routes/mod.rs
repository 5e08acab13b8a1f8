//! # 인증 서비스 라우트
//!
//! 모든 엔드포인트와 라우트별 파이프라인을 한곳에서 선언합니다.
//!
//! ```text
//! /                         GET   서비스 상태 메시지
//! /health                   GET   헬스 체크
//! /auth/register            POST
//! /auth/login               POST  [로그인 제한기]
//! /auth/logout              POST
//! /auth/verify              GET
//! /auth/refresh             POST
//! /auth/verify-email        GET
//! /auth/forgot-password     POST
//! /auth/reset-password      POST
//! /auth/profile             GET, PUT   [쿠키 인증 → 이메일 인증]
//! /auth/change-password     PUT        [쿠키 인증 → 이메일 인증]
//! /superadmin/dashboard     GET        [쿠키 인증 → 이메일 인증 → superadmin]
//! /superadmin/users         GET        [쿠키 인증 → 이메일 인증 → superadmin]
//! ```

use actix_governor::Governor;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use serde_json::json;
use crate::core::AppState;
use crate::domain::models::auth::role::Role;
use crate::errors::AppError;
use crate::handlers;
use crate::middlewares::{CookieAuthenticator, IpRateLimit, Pipeline, RequireVerified, RoleGate};

/// 인증 서비스의 전체 라우트를 등록합니다.
///
/// `login_limit`은 `HttpServer::new` 바깥에서 만든 설정을 복제해 넘겨야
/// 워커 간에 시도 횟수가 공유됩니다.
pub fn configure_auth_service(cfg: &mut web::ServiceConfig, state: web::Data<AppState>, login_limit: IpRateLimit) {
    let codec = state.tokens.codec().clone();
    let verified_session = move || {
        Pipeline::new()
            .with(CookieAuthenticator::new(codec.clone()))
            .with(RequireVerified)
    };

    cfg.app_data(state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(handlers::auth::register))
                .service(
                    web::resource("/login")
                        .wrap(Governor::new(&login_limit))
                        .route(web::post().to(handlers::auth::login)),
                )
                .route("/logout", web::post().to(handlers::auth::logout))
                .route("/verify", web::get().to(handlers::auth::verify))
                .route("/refresh", web::post().to(handlers::auth::refresh))
                .route("/verify-email", web::get().to(handlers::auth::verify_email))
                .route("/forgot-password", web::post().to(handlers::auth::forgot_password))
                .route("/reset-password", web::post().to(handlers::auth::reset_password))
                .service(
                    web::resource("/profile")
                        .wrap(verified_session())
                        .route(web::get().to(handlers::users::get_profile))
                        .route(web::put().to(handlers::users::update_profile)),
                )
                .service(
                    web::resource("/change-password")
                        .wrap(verified_session())
                        .route(web::put().to(handlers::auth::change_password)),
                ),
        )
        .service(
            web::scope("/superadmin")
                .wrap(verified_session().with(RoleGate::authorize_roles(&[Role::SuperAdmin])))
                .route("/dashboard", web::get().to(handlers::admin::dashboard))
                .route("/users", web::get().to(handlers::admin::list_users)),
        )
        .default_service(web::to(not_found));
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Auth service running" }))
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "auth_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": format!("Route not found: {} {}", req.method(), req.path())
    }))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    AppError::ValidationError(format!("Invalid request body: {}", err)).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    AppError::ValidationError(format!("Invalid query string: {}", err)).into()
}
