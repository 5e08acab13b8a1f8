//! 프로필 핸들러
//!
//! `PUT /auth/profile`은 JSON 본문과 `multipart/form-data`(name, email, avatar)를
//! 모두 받습니다. 아바타는 JPEG/PNG, 5MB 이하만 허용합니다.

use actix_multipart::Multipart;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::StreamExt;
use serde_json::json;
use crate::core::AppState;
use crate::domain::dto::users::request::UpdateProfileRequest;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::errors::AppError;
use crate::services::users::AvatarUpload;

pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;
const MAX_JSON_BYTES: usize = 64 * 1024;
const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

pub async fn get_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let profile = state.users.get_profile(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "user": profile })))
}

pub async fn update_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let is_multipart = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let (request, avatar) = if is_multipart {
        read_multipart(Multipart::new(req.headers(), payload)).await?
    } else {
        (read_json(payload).await?, None)
    };

    let profile = state.users.update_profile(&user.user_id, request, avatar).await?;
    Ok(HttpResponse::Ok().json(json!({ "user": profile })))
}

async fn read_json(mut payload: web::Payload) -> Result<UpdateProfileRequest, AppError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AppError::ValidationError(format!("Invalid request body: {}", e)))?;
        if body.len() + chunk.len() > MAX_JSON_BYTES {
            return Err(AppError::ValidationError("Request body too large".to_string()));
        }
        body.extend_from_slice(&chunk);
    }

    if body.is_empty() {
        return Ok(UpdateProfileRequest::default());
    }

    serde_json::from_slice(&body)
        .map_err(|e| AppError::ValidationError(format!("Invalid JSON: {}", e)))
}

async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(UpdateProfileRequest, Option<AvatarUpload>), AppError> {
    let mut request = UpdateProfileRequest::default();
    let mut avatar = None;

    while let Some(field) = multipart.next().await {
        let mut field = field.map_err(|e| AppError::ValidationError(format!("Invalid form data: {}", e)))?;
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "avatar" => {
                let content_type = field
                    .content_type()
                    .map(|m| m.essence_str().to_string())
                    .unwrap_or_default();
                if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
                    return Err(AppError::ValidationError(
                        "Only JPG and PNG images are allowed".to_string(),
                    ));
                }

                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or("avatar")
                    .to_string();

                let bytes = read_field(&mut field, MAX_AVATAR_BYTES, "Avatar image must not exceed 5MB").await?;
                if !bytes.is_empty() {
                    avatar = Some(AvatarUpload { bytes, content_type, file_name });
                }
            }
            "name" | "email" => {
                let bytes = read_field(&mut field, MAX_JSON_BYTES, "Form field too large").await?;
                let value = String::from_utf8(bytes)
                    .map_err(|_| AppError::ValidationError(format!("Invalid {} value", name)))?;
                if name == "name" {
                    request.name = Some(value);
                } else {
                    request.email = Some(value);
                }
            }
            other => {
                log::debug!("알 수 없는 폼 필드 무시: {}", other);
                while let Some(chunk) = field.next().await {
                    chunk.map_err(|e| AppError::ValidationError(format!("Invalid form data: {}", e)))?;
                }
            }
        }
    }

    Ok((request, avatar))
}

async fn read_field(
    field: &mut actix_multipart::Field,
    limit: usize,
    too_large: &str,
) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::ValidationError(format!("Invalid form data: {}", e)))?;
        if data.len() + chunk.len() > limit {
            return Err(AppError::ValidationError(too_large.to_string()));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
