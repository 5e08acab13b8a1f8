//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 서비스는 저장소 trait 객체를 생성자로 주입받으며, 전역 싱글톤 없이
//! [`crate::core::AppState`]에 묶여 핸들러로 전달됩니다.
//!
//! ```rust,ignore
//! let state = AppState::in_memory(AppConfig::for_tests());
//! let registration = state.auth.register(request).await?;
//! ```

pub mod users;
pub mod auth;
