//! 인증 관련 서비스
//!
//! - [`jwt`] - HS256 토큰 인코딩/디코딩 (게이트웨이와 공유)
//! - [`password`] - bcrypt 해싱
//! - [`token_service`] - 액세스 토큰 / refresh token 세션 관리
//! - [`auth_service`] - 회원가입, 로그인, 이메일 인증, 비밀번호 변경/재설정

pub mod jwt;
pub mod password;
pub mod token_service;
pub mod auth_service;

pub use jwt::{extract_bearer_token, JwtCodec};
pub use password::PasswordHasher;
pub use token_service::TokenService;
pub use auth_service::{AuthService, EmailVerification, LoginSession, Registration, FORGOT_PASSWORD_ACK};
