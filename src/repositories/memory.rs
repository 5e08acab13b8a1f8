//! 인메모리 저장소
//!
//! 테스트와 MongoDB 없이 띄우는 로컬 실행용입니다. 프로세스가 끝나면
//! 데이터는 사라집니다.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use crate::domain::entities::{RefreshToken, User, UserChanges};
use crate::errors::{AppError, AppResult};
use crate::repositories::{RefreshTokenStore, UserStore, EMAIL_TAKEN};

fn read<T>(lock: &RwLock<T>) -> AppResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| AppError::InternalError("in-memory store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> AppResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| AppError::InternalError("in-memory store lock poisoned".to_string()))
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<ObjectId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        Ok(read(&self.users)?.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(read(&self.users)?.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        let mut users = write(&self.users)?;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::ConflictError(EMAIL_TAKEN.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, id: &ObjectId, changes: UserChanges) -> AppResult<Option<User>> {
        let mut users = write(&self.users)?;

        if let Some(email) = changes.email.as_deref() {
            if users.values().any(|u| u.email == email && &u.id != id) {
                return Err(AppError::ConflictError(EMAIL_TAKEN.to_string()));
            }
        }

        Ok(users.get_mut(id).map(|user| {
            changes.apply_to(user);
            user.clone()
        }))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = read(&self.users)?.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRefreshTokenStore {
    tokens: RwLock<HashMap<String, RefreshToken>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 사용자별 저장된 토큰 수 (만료 여부 무관)
    pub fn count_for_user(&self, user_id: &ObjectId) -> usize {
        self.tokens
            .read()
            .map(|tokens| tokens.values().filter(|t| &t.user_id == user_id).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn insert(&self, token: &RefreshToken) -> AppResult<()> {
        let mut tokens = write(&self.tokens)?;
        if tokens.contains_key(&token.token) {
            return Err(AppError::DatabaseError("duplicate refresh token".to_string()));
        }
        tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshToken>> {
        Ok(read(&self.tokens)?.get(token).cloned())
    }

    async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        Ok(write(&self.tokens)?.remove(token).is_some())
    }

    async fn delete_all_for_user(&self, user_id: &ObjectId) -> AppResult<u64> {
        let mut tokens = write(&self.tokens)?;
        let before = tokens.len();
        tokens.retain(|_, t| &t.user_id != user_id);
        Ok((before - tokens.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(email: &str) -> User {
        User::new("Tester".into(), email.into(), "hash".into())
    }

    #[actix_web::test]
    async fn test_insert_rejects_duplicate_email() {
        let store = InMemoryUserStore::new();
        store.insert(&user("a@example.com")).await.unwrap();

        let err = store.insert(&user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::ConflictError(_)));
    }

    #[actix_web::test]
    async fn test_update_rejects_email_of_other_user() {
        let store = InMemoryUserStore::new();
        let alice = user("alice@example.com");
        let bob = user("bob@example.com");
        store.insert(&alice).await.unwrap();
        store.insert(&bob).await.unwrap();

        let changes = UserChanges {
            email: Some("alice@example.com".into()),
            ..UserChanges::default()
        };
        let err = store.update(&bob.id, changes).await.unwrap_err();
        assert!(matches!(err, AppError::ConflictError(_)));

        // 자기 자신의 이메일로 "변경"은 허용
        let same = UserChanges {
            email: Some("bob@example.com".into()),
            ..UserChanges::default()
        };
        assert!(store.update(&bob.id, same).await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn test_update_missing_user_returns_none() {
        let store = InMemoryUserStore::new();
        let result = store.update(&ObjectId::new(), UserChanges::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[actix_web::test]
    async fn test_delete_all_for_user_keeps_other_users() {
        let store = InMemoryRefreshTokenStore::new();
        let alice = ObjectId::new();
        let bob = ObjectId::new();

        store.insert(&RefreshToken::issue(alice, Duration::days(1))).await.unwrap();
        store.insert(&RefreshToken::issue(alice, Duration::days(1))).await.unwrap();
        let bobs = RefreshToken::issue(bob, Duration::days(1));
        store.insert(&bobs).await.unwrap();

        assert_eq!(store.delete_all_for_user(&alice).await.unwrap(), 2);
        assert_eq!(store.count_for_user(&alice), 0);
        assert!(store.find_by_token(&bobs.token).await.unwrap().is_some());
    }
}
