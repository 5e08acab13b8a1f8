//! # HTTP 미들웨어
//!
//! - [`pipeline`] - 라우트별 인증/인가 단계를 순서대로 실행하는 미들웨어
//! - [`interceptors`] - 쿠키/Bearer 인증, 이메일 인증 확인, 역할 검사
//! - [`rate_limit`] - IP 기반 요청 제한 (`actix-governor`)
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use commerce_auth::middlewares::{CookieAuthenticator, Pipeline, RequireVerified, RoleGate};
//! use commerce_auth::domain::Role;
//!
//! let admin_only = Pipeline::new()
//!     .with(CookieAuthenticator::new(codec.clone()))
//!     .with(RequireVerified)
//!     .with(RoleGate::authorize_roles(&[Role::SuperAdmin]));
//!
//! cfg.service(web::scope("/superadmin").wrap(admin_only).route("/users", web::get().to(list_users)));
//! ```

pub mod pipeline;
pub mod interceptors;
pub mod rate_limit;

pub use interceptors::{BearerAuthenticator, CookieAuthenticator, RequireVerified, RoleGate, ACCESS_TOKEN_COOKIE};
pub use pipeline::{Interceptor, Outcome, Pipeline};
pub use rate_limit::{ip_rate_limit, ClientIpKey, IpRateLimit, RateLimiters};
