//! 사용자 응답 DTO
//!
//! 클라이언트에게 반환되는 사용자 표현입니다. 비밀번호 해시는 포함하지 않습니다.

use serde::{Deserialize, Serialize};
use crate::domain::entities::users::user::User;
use crate::domain::models::auth::role::Role;

/// 비밀번호를 제외한 사용자 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    /// RFC 3339
    pub last_login: Option<String>,
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            is_verified: user.is_verified,
            last_login: user.last_login.and_then(|dt| dt.try_to_rfc3339_string().ok()),
            avatar: user.avatar.clone(),
            created_at: user.created_at.try_to_rfc3339_string().unwrap_or_default(),
            updated_at: user.updated_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}
