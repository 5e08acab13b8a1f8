use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    Collection, IndexModel,
};
use std::time::Duration;
use crate::db::Database;
use crate::domain::entities::tokens::refresh_token::RefreshToken;
use crate::errors::{AppError, AppResult};
use crate::repositories::RefreshTokenStore;

/// Refresh token 리포지토리
///
/// 만료된 행은 `expiresAt` TTL 인덱스로 MongoDB가 주기적으로 제거합니다.
/// TTL 삭제는 즉시 일어나지 않으므로 조회 시점의 만료 검사는 서비스 계층이 합니다.
#[derive(Clone)]
pub struct MongoRefreshTokenRepository {
    collection: Collection<RefreshToken>,
}

impl MongoRefreshTokenRepository {
    pub const COLLECTION: &'static str = "refreshtokens";

    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.get_database().collection::<RefreshToken>(Self::COLLECTION),
        }
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let token_index = IndexModel::builder()
            .keys(doc! { "token": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("token_unique".to_string())
                .build())
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "userId": 1 })
            .options(IndexOptions::builder()
                .name("user_id_asc".to_string())
                .build())
            .build();

        // expireAfterSeconds = 0: expiresAt 시각이 지나면 삭제
        let ttl_index = IndexModel::builder()
            .keys(doc! { "expiresAt": 1 })
            .options(IndexOptions::builder()
                .expire_after(Duration::from_secs(0))
                .name("expires_at_ttl".to_string())
                .build())
            .build();

        self.collection
            .create_indexes([token_index, user_index, ttl_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for MongoRefreshTokenRepository {
    async fn insert(&self, token: &RefreshToken) -> AppResult<()> {
        self.collection
            .insert_one(token)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshToken>> {
        self.collection
            .find_one(doc! { "token": token })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        let result = self.collection
            .delete_one(doc! { "token": token })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }

    async fn delete_all_for_user(&self, user_id: &ObjectId) -> AppResult<u64> {
        let result = self.collection
            .delete_many(doc! { "userId": *user_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count)
    }
}
