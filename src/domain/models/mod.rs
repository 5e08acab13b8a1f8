//! 엔티티가 아닌 도메인 모델 (인증 주체, 역할, 토큰 클레임)

pub mod auth;
pub mod token;

pub use auth::*;
pub use token::*;
