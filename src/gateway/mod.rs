//! # API Gateway
//!
//! 상태를 갖지 않는 진입점입니다. 접두사별로 Bearer 토큰과 역할을 검사한 뒤
//! 해당 다운스트림 서비스로 요청을 그대로 전달합니다. 인증/인가 실패는 모두
//! 다운스트림 호출 전에 응답됩니다.
//!
//! ```text
//! /auth/*      → auth 서비스       (공개)
//! /user/*      → user 서비스       [Bearer → admin|superadmin]
//! /orders/*    → orders 서비스     [Bearer → manager|admin|superadmin]
//! /products/*  → products 서비스   (공개)
//! ```

pub mod proxy;

use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;
use crate::config::AppConfig;
use crate::domain::models::auth::role::Role;
use crate::errors::AppResult;
use crate::middlewares::{BearerAuthenticator, Pipeline, RoleGate};
use crate::services::auth::JwtCodec;
use self::proxy::{build_client, ServiceProxy};

/// 프록시 요청 본문 한도 (아바타 업로드 5MB + 폼 오버헤드)
const MAX_PROXY_BODY_BYTES: usize = 6 * 1024 * 1024;

const FORBIDDEN_MESSAGE: &str = "Forbidden: Insufficient permissions";

#[derive(Clone)]
pub struct Gateway {
    codec: JwtCodec,
    auth: ServiceProxy,
    user: ServiceProxy,
    orders: ServiceProxy,
    products: ServiceProxy,
}

impl Gateway {
    /// 다운스트림 주소와 타임아웃으로 게이트웨이를 구성합니다.
    ///
    /// 네 프록시는 연결 풀을 가진 하나의 클라이언트를 공유합니다.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let client = build_client(config.gateway.timeout())?;
        let upstreams = &config.gateway;

        info!(
            "🔀 게이트웨이 대상: auth={} user={} orders={} products={} (timeout {}ms)",
            upstreams.auth_service_url,
            upstreams.user_service_url,
            upstreams.orders_service_url,
            upstreams.products_service_url,
            upstreams.timeout_ms
        );

        Ok(Self {
            codec: JwtCodec::new(&config.jwt.secret),
            auth: ServiceProxy::new("auth", &upstreams.auth_service_url, client.clone()),
            user: ServiceProxy::new("user", &upstreams.user_service_url, client.clone()),
            orders: ServiceProxy::new("orders", &upstreams.orders_service_url, client.clone()),
            products: ServiceProxy::new("products", &upstreams.products_service_url, client),
        })
    }

    fn bearer_with_roles(&self, roles: &[Role]) -> Pipeline {
        Pipeline::new()
            .with(BearerAuthenticator::new(self.codec.clone()))
            .with(RoleGate::authorize_roles(roles).with_message(FORBIDDEN_MESSAGE))
    }

    /// 게이트웨이 라우트를 등록합니다.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::PayloadConfig::new(MAX_PROXY_BODY_BYTES))
            .route("/", web::get().to(index))
            .route("/health", web::get().to(health_check))
            .service(proxied_scope("/auth", &self.auth))
            .service(
                proxied_scope("/user", &self.user)
                    .wrap(self.bearer_with_roles(&[Role::Admin, Role::SuperAdmin])),
            )
            .service(
                proxied_scope("/orders", &self.orders)
                    .wrap(self.bearer_with_roles(&[Role::Manager, Role::Admin, Role::SuperAdmin])),
            )
            .service(proxied_scope("/products", &self.products))
            .default_service(web::to(crate::routes::not_found));
    }
}

/// 접두사 아래 모든 경로와 메서드를 프록시로 넘기는 스코프
fn proxied_scope(prefix: &str, proxy: &ServiceProxy) -> actix_web::Scope {
    web::scope(prefix)
        .app_data(web::Data::new(proxy.clone()))
        .default_service(web::to(proxy::forward))
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("API Gateway is running")
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_index_is_plain_text() {
        let gateway = Gateway::from_config(&AppConfig::for_tests()).unwrap();
        let app = test::init_service(App::new().configure(|cfg| gateway.configure(cfg))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        assert_eq!(body, "API Gateway is running");
    }

    #[actix_web::test]
    async fn test_protected_prefix_rejects_before_proxying() {
        let gateway = Gateway::from_config(&AppConfig::for_tests()).unwrap();
        let app = test::init_service(App::new().configure(|cfg| gateway.configure(cfg))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/orders/1").to_request()).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_unknown_prefix_is_not_found() {
        let gateway = Gateway::from_config(&AppConfig::for_tests()).unwrap();
        let app = test::init_service(App::new().configure(|cfg| gateway.configure(cfg))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;
        assert_eq!(resp.status(), 404);
    }
}
