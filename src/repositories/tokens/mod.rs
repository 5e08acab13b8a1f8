//! Refresh token 저장 계층
//!
//! 토큰 행의 존재와 `expiresAt`만이 세션 유효성을 결정합니다.

pub mod token_repository;
