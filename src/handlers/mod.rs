//! HTTP 핸들러
//!
//! 핸들러는 요청을 DTO로 받아 서비스에 넘기고, 결과를 JSON과 쿠키로 바꾸는 일만 합니다.
//! 인증/인가는 [`crate::routes`]에서 라우트마다 씌우는 파이프라인이 처리합니다.

pub mod cookies;
pub mod auth;
pub mod users;
pub mod admin;
