//! # 사용자 리포지토리 구현
//!
//! `users` 컬렉션에 대한 MongoDB 기반 [`UserStore`] 구현입니다.
//!
//! ## 인덱스
//! - `email` (unique) - 중복 가입을 저장소 수준에서도 차단
//! - `role` - 역할별 조회

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use crate::db::Database;
use crate::domain::entities::users::user::{User, UserChanges};
use crate::errors::{AppError, AppResult};
use crate::repositories::{UserStore, EMAIL_TAKEN};

/// 사용자 데이터 액세스 리포지토리
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub const COLLECTION: &'static str = "users";

    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.get_database().collection::<User>(Self::COLLECTION),
        }
    }

    /// 컬렉션 인덱스 생성
    ///
    /// 애플리케이션 시작 시 한 번 호출합니다. 이미 존재하는 인덱스는 그대로 둡니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        // 이메일 유니크 인덱스
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let role_index = IndexModel::builder()
            .keys(doc! { "role": 1 })
            .options(IndexOptions::builder()
                .name("role_asc".to_string())
                .build())
            .build();

        self.collection
            .create_indexes([email_index, role_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    fn to_set_document(changes: UserChanges) -> Document {
        let mut set = doc! { "updatedAt": DateTime::now() };

        if let Some(name) = changes.name {
            set.insert("name", name);
        }
        if let Some(email) = changes.email {
            set.insert("email", email);
        }
        if let Some(password) = changes.password {
            set.insert("password", password);
        }
        if let Some(is_verified) = changes.is_verified {
            set.insert("isVerified", is_verified);
        }
        if let Some(last_login) = changes.last_login {
            set.insert("lastLogin", last_login);
        }
        if let Some(avatar) = changes.avatar {
            set.insert("avatar", avatar);
        }

        set
    }
}

/// E11000 duplicate key 에러인지 확인합니다.
pub(crate) fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == 11000,
        ErrorKind::Command(e) => e.code == 11000,
        _ => false,
    }
}

fn map_write_error(error: mongodb::error::Error) -> AppError {
    if is_duplicate_key(&error) {
        AppError::ConflictError(EMAIL_TAKEN.to_string())
    } else {
        AppError::DatabaseError(error.to_string())
    }
}

#[async_trait]
impl UserStore for MongoUserRepository {
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        self.collection
            .find_one(doc! { "_id": *id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.collection
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        self.collection
            .insert_one(user)
            .await
            .map_err(map_write_error)?;

        log::debug!("사용자 생성: {}", user.id);
        Ok(())
    }

    async fn update(&self, id: &ObjectId, changes: UserChanges) -> AppResult<Option<User>> {
        let set = Self::to_set_document(changes);

        self.collection
            .find_one_and_update(doc! { "_id": *id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_write_error)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let cursor = self.collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_document_contains_only_changes() {
        let set = MongoUserRepository::to_set_document(UserChanges {
            is_verified: Some(true),
            ..UserChanges::default()
        });

        assert!(set.get_bool("isVerified").unwrap());
        assert!(set.contains_key("updatedAt"));
        assert!(!set.contains_key("name"));
        assert!(!set.contains_key("password"));
    }
}
