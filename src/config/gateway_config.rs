//! 게이트웨이 다운스트림 서비스 설정

use std::time::Duration;
use super::{env_or, env_parse};

/// 게이트웨이가 프록시하는 서비스 주소와 타임아웃
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub auth_service_url: String,
    pub user_service_url: String,
    pub orders_service_url: String,
    pub products_service_url: String,
    /// 다운스트림 호출 타임아웃 (밀리초)
    pub timeout_ms: u64,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            auth_service_url: env_or("AUTH_SERVICE_URL", "http://localhost:5001"),
            user_service_url: env_or("USER_SERVICE_URL", "http://localhost:5002"),
            orders_service_url: env_or("ORDERS_SERVICE_URL", "http://localhost:5003"),
            products_service_url: env_or("PRODUCTS_SERVICE_URL", "http://localhost:5004"),
            timeout_ms: env_parse("PROXY_TIMEOUT_MS", 5000),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            auth_service_url: "http://localhost:5001".to_string(),
            user_service_url: "http://localhost:5002".to_string(),
            orders_service_url: "http://localhost:5003".to_string(),
            products_service_url: "http://localhost:5004".to_string(),
            timeout_ms: 5000,
        }
    }
}
