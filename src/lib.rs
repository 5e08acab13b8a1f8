//! 커머스 인증 서비스 백엔드
//!
//! 이커머스 플랫폼의 인증 서비스와 그 앞단의 API 게이트웨이입니다.
//! 인증 서비스는 HttpOnly 쿠키에 담긴 JWT로 세션을 관리하고, 게이트웨이는
//! Bearer 토큰과 역할을 검사한 뒤 다운스트림 서비스로 요청을 전달합니다.
//!
//! # Features
//!
//! - **계정**: 회원가입, 이메일 인증, 로그인/로그아웃, 비밀번호 변경/재설정
//! - **세션**: 단기 access 토큰 + 저장소에 기록되는 refresh 토큰
//! - **프로필**: 이름/이메일 수정, 아바타 업로드
//! - **인가**: 라우트별 인터셉터 파이프라인 (쿠키/Bearer 인증, 이메일 인증, 역할)
//! - **게이트웨이**: 접두사별 역할 허용 목록, 리버스 프록시, IP 기반 요청 제한
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐        ┌─────────────────┐
//! │     Gateway     │ ─────► │   HTTP Routes   │ ← 인증 서비스 엔드포인트
//! └─────────────────┘        └─────────────────┘
//!                                     │
//!                                     ▼
//!                            ┌─────────────────┐
//!                            │    Handlers     │ ← 요청/응답, 쿠키
//!                            └─────────────────┘
//!                                     │
//!                                     ▼
//!                            ┌─────────────────┐
//!                            │    Services     │ ← 비즈니스 로직
//!                            └─────────────────┘
//!                                     │
//!                                     ▼
//!                            ┌─────────────────┐
//!                            │  Repositories   │ ← MongoDB / 인메모리
//!                            └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use commerce_auth::config::AppConfig;
//! use commerce_auth::core::AppState;
//!
//! let state = AppState::in_memory(AppConfig::for_tests());
//! let registration = state.auth.register(request).await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
pub mod gateway;
