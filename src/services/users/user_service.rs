//! # 사용자 프로필 서비스
//!
//! 로그인한 사용자의 프로필 조회/수정과 관리자용 사용자 목록을 제공합니다.
//! 응답은 항상 [`UserResponse`]로 변환되어 비밀번호 해시가 노출되지 않습니다.

use std::sync::Arc;
use log::info;
use mongodb::bson::oid::ObjectId;
use validator::Validate;
use crate::domain::dto::users::request::validators::first_message;
use crate::domain::dto::users::request::UpdateProfileRequest;
use crate::domain::dto::users::response::UserResponse;
use crate::domain::entities::UserChanges;
use crate::errors::{AppError, AppResult};
use crate::repositories::UserStore;
use super::avatar_store::{AvatarStore, AvatarUpload};

const EMAIL_IN_USE: &str = "Email already in use";

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    avatars: Arc<dyn AvatarStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, avatars: Arc<dyn AvatarStore>) -> Self {
        Self { users, avatars }
    }

    pub async fn get_profile(&self, user_id: &str) -> AppResult<UserResponse> {
        let id = parse_user_id(user_id)?;

        self.users
            .find_by_id(&id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// 프로필 부분 수정
    ///
    /// 비어 있는 필드는 무시합니다. 아바타가 있으면 먼저 업로드한 뒤
    /// 반환된 URL을 함께 저장합니다.
    ///
    /// # Errors
    ///
    /// * 이름/이메일 형식 오류 - `ValidationError`
    /// * 다른 사용자가 쓰는 이메일 - `ConflictError`
    /// * 사용자 없음 - `NotFound`
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
        avatar: Option<AvatarUpload>,
    ) -> AppResult<UserResponse> {
        let id = parse_user_id(user_id)?;
        let request = request.normalized();
        request
            .validate()
            .map_err(|e| AppError::ValidationError(first_message(&e)))?;

        let current = self.users
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(email) = request.email.as_deref() {
            if email != current.email {
                if let Some(owner) = self.users.find_by_email(email).await? {
                    if owner.id != current.id {
                        return Err(AppError::ConflictError(EMAIL_IN_USE.to_string()));
                    }
                }
            }
        }

        let avatar_url = match avatar {
            Some(file) => Some(self.avatars.upload(&current.id_string(), file).await?),
            None => None,
        };

        let changes = UserChanges {
            name: request.name,
            email: request.email,
            avatar: avatar_url,
            ..Default::default()
        };

        if changes.is_empty() {
            return Ok(UserResponse::from(current));
        }

        let updated = self.users
            .update(&id, changes)
            .await
            .map_err(|e| match e {
                AppError::ConflictError(_) => AppError::ConflictError(EMAIL_IN_USE.to_string()),
                other => other,
            })?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        info!("프로필 수정: user={}", updated.id);
        Ok(UserResponse::from(updated))
    }

    /// 전체 사용자 목록 (최근 가입 순)
    pub async fn list_users(&self) -> AppResult<Vec<UserResponse>> {
        let users = self.users.list().await?;
        Ok(users.iter().map(UserResponse::from).collect())
    }
}

/// 토큰의 사용자 ID를 ObjectId로 변환
///
/// 형식이 잘못된 ID는 존재하지 않는 사용자로 취급합니다.
fn parse_user_id(user_id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(user_id).map_err(|_| AppError::NotFound("User not found".to_string()))
}
