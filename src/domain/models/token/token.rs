//! JWT 클레임 정의
//!
//! 액세스 토큰과 일회성 작업 토큰(이메일 인증, 비밀번호 재설정)은
//! 필수 필드가 서로 달라 한 종류가 다른 종류로 디코딩되지 않습니다.

use serde::{Deserialize, Serialize};
use crate::domain::models::auth::role::Role;

/// 액세스 토큰 클레임 `{id, role, isVerified}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    /// 사용자 ID (ObjectId hex)
    pub id: String,
    pub role: Role,
    pub is_verified: bool,
    pub iat: i64,
    pub exp: i64,
}

/// 작업 토큰의 용도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenPurpose {
    VerifyEmail,
    ResetPassword,
}

/// 이메일 인증/비밀번호 재설정 링크에 담기는 클레임
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionClaims {
    pub id: String,
    pub purpose: TokenPurpose,
    /// 발급 시점의 비밀번호 해시 지문
    ///
    /// 비밀번호가 바뀌면 지문이 달라져 같은 토큰을 다시 쓸 수 없습니다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fp: Option<String>,
    pub iat: i64,
    pub exp: i64,
}
