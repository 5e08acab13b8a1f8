//! bcrypt 비밀번호 해싱
//!
//! 해싱과 비교는 CPU를 오래 점유하므로 actix 블로킹 스레드 풀에서 실행합니다.

use actix_web::web;
use sha2::{Digest, Sha256};
use crate::errors::{AppResult, ErrorContext};

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, plain: &str) -> AppResult<String> {
        let plain = plain.to_owned();
        let cost = self.cost;

        web::block(move || bcrypt::hash(plain, cost))
            .await
            .context("해싱 작업 실행 실패")?
            .context("비밀번호 해싱 실패")
    }

    /// 평문이 해시와 일치하는지 확인합니다.
    pub async fn verify(&self, plain: &str, hash: &str) -> AppResult<bool> {
        let plain = plain.to_owned();
        let hash = hash.to_owned();

        web::block(move || bcrypt::verify(plain, &hash))
            .await
            .context("해싱 작업 실행 실패")?
            .context("비밀번호 비교 실패")
    }

    /// 저장된 해시의 짧은 지문
    ///
    /// 비밀번호 재설정 토큰에 넣어, 비밀번호가 바뀐 뒤에는 토큰이 무효가 되게 합니다.
    pub fn fingerprint(hash: &str) -> String {
        let digest = Sha256::digest(hash.as_bytes());
        format!("{:x}", digest)[..16].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(4);
        let hash = hasher.hash("Secret123!").await.unwrap();

        assert_ne!(hash, "Secret123!");
        assert!(hasher.verify("Secret123!", &hash).await.unwrap());
        assert!(!hasher.verify("Secret123?", &hash).await.unwrap());
    }

    #[test]
    fn test_fingerprint_changes_with_hash() {
        let a = PasswordHasher::fingerprint("$2b$04$aaaa");
        let b = PasswordHasher::fingerprint("$2b$04$bbbb");

        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
        assert_eq!(a, PasswordHasher::fingerprint("$2b$04$aaaa"));
    }
}
