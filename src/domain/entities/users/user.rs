//! User Entity Implementation
//!
//! `users` 컬렉션에 저장되는 사용자 문서입니다.
//! 필드 이름은 기존 데이터와 호환되도록 camelCase로 저장합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::domain::models::auth::role::Role;

/// 사용자 엔티티
///
/// `password`에는 항상 bcrypt 해시만 저장되며, 이 구조체는 클라이언트
/// 응답으로 직접 직렬화하지 않습니다. 응답에는 [`UserResponse`]를 사용합니다.
///
/// [`UserResponse`]: crate::domain::dto::users::response::UserResponse
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// 표시 이름 (2-50자, 앞뒤 공백 제거)
    pub name: String,
    /// 소문자로 정규화된 이메일 (unique)
    pub email: String,
    /// bcrypt 해시
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub last_login: Option<DateTime>,
    /// 아바타 이미지 URL
    #[serde(default)]
    pub avatar: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// 이메일 인증 전 상태의 일반 사용자 생성
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = DateTime::now();

        Self {
            id: ObjectId::new(),
            name,
            email,
            password: password_hash,
            role: Role::User,
            is_verified: false,
            last_login: None,
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> String {
        self.id.to_hex()
    }
}

/// 부분 업데이트 명세
///
/// `None`인 필드는 변경하지 않습니다. `updated_at`은 저장소가 갱신합니다.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_verified: Option<bool>,
    pub last_login: Option<DateTime>,
    pub avatar: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.is_verified.is_none()
            && self.last_login.is_none()
            && self.avatar.is_none()
    }

    /// 변경 사항을 사용자에 적용합니다.
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(password) = self.password {
            user.password = password;
        }
        if let Some(is_verified) = self.is_verified {
            user.is_verified = is_verified;
        }
        if let Some(last_login) = self.last_login {
            user.last_login = Some(last_login);
        }
        if let Some(avatar) = self.avatar {
            user.avatar = Some(avatar);
        }
        user.updated_at = DateTime::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("Alice".into(), "alice@example.com".into(), "$2b$04$hash".into());

        assert_eq!(user.role, Role::User);
        assert!(!user.is_verified);
        assert!(user.last_login.is_none());
        assert!(user.avatar.is_none());
        assert_eq!(user.id_string().len(), 24);
    }

    #[test]
    fn test_document_uses_camel_case() {
        let user = User::new("Alice".into(), "alice@example.com".into(), "hash".into());
        let doc = mongodb::bson::to_document(&user).unwrap();

        assert!(doc.contains_key("_id"));
        assert!(doc.contains_key("isVerified"));
        assert!(doc.contains_key("lastLogin"));
        assert!(doc.contains_key("createdAt"));
        assert_eq!(doc.get_str("role").unwrap(), "user");
    }

    #[test]
    fn test_changes_apply_only_provided_fields() {
        let mut user = User::new("Alice".into(), "alice@example.com".into(), "hash".into());
        let changes = UserChanges {
            name: Some("Alicia".into()),
            ..UserChanges::default()
        };
        assert!(!changes.is_empty());

        changes.apply_to(&mut user);

        assert_eq!(user.name, "Alicia");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.password, "hash");
    }
}
