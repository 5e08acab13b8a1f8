//! IP 기반 요청 제한
//!
//! `actix-governor`의 GCRA 제한기를 클라이언트 IP마다 둡니다.
//! 설정의 "window 동안 max 요청"은 burst = max, 보충 주기 = window / max 로 옮깁니다.
//!
//! 제한기 상태는 `GovernorConfig` 안의 `Arc`에 있으므로, 설정은 `HttpServer::new`
//! 바깥에서 한 번만 만들고 워커마다 복제해서 써야 워커 간에 카운트가 공유됩니다.

use std::time::Duration;
use actix_governor::governor::clock::QuantaInstant;
use actix_governor::governor::middleware::NoOpMiddleware;
use actix_governor::governor::NotUntil;
use actix_governor::{GovernorConfig, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, HttpResponseBuilder};
use log::info;
use crate::config::RateLimitConfig;
use crate::errors::{AppError, AppResult};

pub const GENERAL_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";
pub const AUTH_LIMIT_MESSAGE: &str = "Too many login attempts, please try again later.";

const UNKNOWN_CLIENT: &str = "unknown";

/// 클라이언트 IP를 키로 쓰고, 한도 초과 시 고정 문구를 돌려주는 추출기
#[derive(Debug, Clone)]
pub struct ClientIpKey {
    message: &'static str,
}

impl ClientIpKey {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

impl KeyExtractor for ClientIpKey {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        // 소켓 주소 우선, 없으면 프록시 헤더, 둘 다 없으면 공용 버킷
        let key = req.peer_addr()
            .map(|addr| addr.ip().to_string())
            .or_else(|| req.connection_info().realip_remote_addr().map(str::to_owned))
            .unwrap_or_else(|| {
                log::debug!("클라이언트 IP 확인 불가, 공용 버킷 사용: {}", req.path());
                UNKNOWN_CLIENT.to_string()
            });

        Ok(key)
    }

    fn exceed_rate_limit_response(
        &self,
        _negative: &NotUntil<QuantaInstant>,
        mut response: HttpResponseBuilder,
    ) -> HttpResponse {
        response.content_type(ContentType::plaintext()).body(self.message)
    }
}

pub type IpRateLimit = GovernorConfig<ClientIpKey, NoOpMiddleware<QuantaInstant>>;

/// `max` 요청 / `window` 제한 구성
pub fn ip_rate_limit(window: Duration, max: u32, message: &'static str) -> AppResult<IpRateLimit> {
    let max = max.max(1);
    let period = (window / max).max(Duration::from_millis(1));

    GovernorConfigBuilder::default()
        .period(period)
        .burst_size(max)
        .key_extractor(ClientIpKey::new(message))
        .finish()
        .ok_or_else(|| AppError::InternalError(format!(
            "Rate limit 설정 오류: window={:?}, max={}", window, max
        )))
}

/// 프로세스 전체에서 공유하는 제한기 묶음
#[derive(Clone)]
pub struct RateLimiters {
    /// 모든 요청 (게이트웨이)
    pub general: IpRateLimit,
    /// 로그인 시도
    pub auth: IpRateLimit,
}

impl RateLimiters {
    pub fn from_config(config: &RateLimitConfig) -> AppResult<Self> {
        let window = Duration::from_secs(config.window_secs);

        let limiters = Self {
            general: ip_rate_limit(window, config.general_max, GENERAL_LIMIT_MESSAGE)?,
            auth: ip_rate_limit(window, config.auth_max, AUTH_LIMIT_MESSAGE)?,
        };

        info!(
            "🛡️ Rate Limiting 활성화: {}초당 일반 {}회, 로그인 {}회",
            config.window_secs, config.general_max, config.auth_max
        );
        Ok(limiters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_governor::Governor;
    use actix_web::{test, web, App, HttpResponse};

    #[actix_web::test]
    async fn test_limit_exceeded_returns_plain_text_429() {
        let limit = ip_rate_limit(Duration::from_secs(900), 2, AUTH_LIMIT_MESSAGE).unwrap();
        let app = test::init_service(
            App::new().service(
                web::resource("/login")
                    .wrap(Governor::new(&limit))
                    .to(HttpResponse::Ok),
            ),
        ).await;

        let request = || {
            test::TestRequest::post()
                .uri("/login")
                .peer_addr("10.0.0.1:40000".parse().unwrap())
                .to_request()
        };

        assert!(test::call_service(&app, request()).await.status().is_success());
        assert!(test::call_service(&app, request()).await.status().is_success());

        let resp = test::call_service(&app, request()).await;
        assert_eq!(resp.status(), 429);
        assert_eq!(test::read_body(resp).await, AUTH_LIMIT_MESSAGE);
    }

    #[actix_web::test]
    async fn test_limits_are_per_ip() {
        let limit = ip_rate_limit(Duration::from_secs(900), 1, GENERAL_LIMIT_MESSAGE).unwrap();
        let app = test::init_service(
            App::new().wrap(Governor::new(&limit)).route("/", web::get().to(HttpResponse::Ok)),
        ).await;

        let from = |ip: &str| {
            test::TestRequest::get()
                .uri("/")
                .peer_addr(format!("{}:1234", ip).parse().unwrap())
                .to_request()
        };

        assert!(test::call_service(&app, from("10.0.0.1")).await.status().is_success());
        assert_eq!(test::call_service(&app, from("10.0.0.1")).await.status(), 429);
        assert!(test::call_service(&app, from("10.0.0.2")).await.status().is_success());
    }

    #[actix_web::test]
    async fn test_from_config() {
        let config = RateLimitConfig::default();
        assert!(RateLimiters::from_config(&config).is_ok());
    }
}
