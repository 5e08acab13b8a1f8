//! HS256 JWT 인코더/디코더
//!
//! 인증 서비스와 게이트웨이가 같은 비밀키로 공유하는 순수 함수 계층입니다.
//! 저장소나 설정 전역 상태에 의존하지 않습니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use crate::domain::models::auth::role::Role;
use crate::domain::models::token::token::{AccessClaims, ActionClaims, TokenPurpose};
use crate::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// 액세스 토큰 서명
    ///
    /// # Arguments
    ///
    /// * `user_id` - 사용자 ObjectId hex
    /// * `ttl` - 만료까지의 시간. 음수이면 이미 만료된 토큰이 만들어집니다.
    pub fn encode_access(
        &self,
        user_id: &str,
        role: Role,
        is_verified: bool,
        ttl: Duration,
    ) -> AppResult<String> {
        let now = Utc::now();
        let claims = AccessClaims {
            id: user_id.to_string(),
            role,
            is_verified,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
    }

    /// 액세스 토큰 검증
    ///
    /// 서명 불일치, 만료, 클레임 누락 모두 `AuthenticationError`로 처리합니다.
    pub fn decode_access(&self, token: &str) -> AppResult<AccessClaims> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::AuthenticationError(format!("Invalid token: {}", e)))
    }

    pub fn encode_action(
        &self,
        user_id: &str,
        purpose: TokenPurpose,
        fingerprint: Option<String>,
        ttl: Duration,
    ) -> AppResult<String> {
        let now = Utc::now();
        let claims = ActionClaims {
            id: user_id.to_string(),
            purpose,
            fp: fingerprint,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("작업 토큰 생성 실패: {}", e)))
    }

    /// 작업 토큰 검증
    ///
    /// 용도가 다른 토큰이나 액세스 토큰은 거부합니다.
    pub fn decode_action(&self, token: &str, purpose: TokenPurpose) -> AppResult<ActionClaims> {
        let claims = decode::<ActionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("작업 토큰 검증 실패: {}", e);
                AppError::ValidationError("Invalid or expired token".to_string())
            })?;

        if claims.purpose != purpose {
            log::warn!("작업 토큰 용도 불일치: expected {:?}, got {:?}", purpose, claims.purpose);
            return Err(AppError::ValidationError("Invalid or expired token".to_string()));
        }

        Ok(claims)
    }
}

/// `Authorization: Bearer <token>` 헤더 값에서 토큰을 꺼냅니다.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let (scheme, token) = auth_header.trim().split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
