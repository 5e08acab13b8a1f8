//! # Domain Layer Module
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── Entities  - MongoDB 에 저장되는 문서 (User, RefreshToken)
//! ├── DTOs      - 요청/응답 데이터 (검증 포함)
//! └── Models    - 역할, 인증 주체, JWT 클레임
//! ```

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::{RefreshToken, User, UserChanges};
pub use dto::users::request::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, UpdateProfileRequest, VerifyEmailQuery,
};
pub use dto::users::response::UserResponse;
pub use models::{AccessClaims, ActionClaims, AuthenticatedUser, RequestContext, Role, TokenPurpose};
