//! # Repository Layer
//!
//! 저장소 접근은 두 개의 async trait을 통해서만 이루어집니다.
//!
//! - [`UserStore`] - `users` 컬렉션
//! - [`RefreshTokenStore`] - `refreshtokens` 컬렉션
//!
//! 운영 환경에서는 MongoDB 구현체를, 테스트와 DB 없는 로컬 실행에서는
//! [`memory`] 모듈의 인메모리 구현체를 사용합니다. 캐시 계층은 없으며
//! 모든 세션 검사는 저장소 조회로 이루어집니다.

pub mod users;
pub mod tokens;
pub mod memory;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use crate::domain::entities::{RefreshToken, User, UserChanges};
use crate::errors::AppResult;

pub use memory::{InMemoryRefreshTokenStore, InMemoryUserStore};
pub use tokens::token_repository::MongoRefreshTokenRepository;
pub use users::user_repo::MongoUserRepository;

/// 사용자 저장소
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>>;

    /// 정규화된(소문자) 이메일로 조회
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// 새 사용자 저장
    ///
    /// 이메일이 이미 사용 중이면 `AppError::ConflictError`를 반환합니다.
    async fn insert(&self, user: &User) -> AppResult<()>;

    /// 부분 업데이트 후 갱신된 문서를 반환합니다.
    ///
    /// 사용자가 없으면 `Ok(None)`, 다른 사용자의 이메일로 바꾸려 하면
    /// `AppError::ConflictError`를 반환합니다.
    async fn update(&self, id: &ObjectId, changes: UserChanges) -> AppResult<Option<User>>;

    /// 생성일 역순 전체 목록
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// Refresh token 저장소
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn insert(&self, token: &RefreshToken) -> AppResult<()>;

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshToken>>;

    /// 삭제 여부를 반환합니다.
    async fn delete_by_token(&self, token: &str) -> AppResult<bool>;

    /// 삭제된 행 수를 반환합니다.
    async fn delete_all_for_user(&self, user_id: &ObjectId) -> AppResult<u64>;
}

/// 이메일 중복 시 반환하는 메시지
pub const EMAIL_TAKEN: &str = "Email already registered";
