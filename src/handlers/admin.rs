//! 슈퍼 관리자 전용 핸들러
//!
//! 라우트 파이프라인이 `superadmin` 역할을 이미 확인한 뒤 호출됩니다.

use actix_web::{web, HttpResponse};
use serde_json::json;
use crate::core::AppState;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::errors::AppError;

pub async fn dashboard(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Superadmin dashboard",
        "user": {
            "id": user.user_id,
            "role": user.role,
            "isVerified": user.is_verified,
        },
    }))
}

pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let users = state.users.list_users().await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "List of users",
        "count": users.len(),
        "users": users,
    })))
}
