//! # Configuration Module
//!
//! 인증 서비스와 게이트웨이의 설정을 관리하는 모듈입니다.
//! 모든 설정은 프로세스 시작 시 [`AppConfig::from_env`]로 한 번만 읽고,
//! 이후에는 값 그대로 각 컴포넌트에 전달됩니다. 요청 처리 중에 환경 변수를
//! 다시 읽는 컴포넌트는 없습니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, 데이터베이스, 비밀번호, Rate Limit
//! - [`auth_config`] - JWT 토큰 수명, 아바타 저장소
//! - [`gateway_config`] - 게이트웨이 다운스트림 서비스
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use commerce_auth::config::{load_env_file, AppConfig};
//!
//! load_env_file();
//! let config = AppConfig::from_env();
//! println!("Auth service will bind to {}:{}", config.server.host, config.server.auth_port);
//! ```
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! export ENVIRONMENT="production"   # development, test, staging, production
//! export JWT_SECRET="your-super-secret-key"
//! export MONGO_URI="mongodb://localhost:27017"
//! export FRONTEND_URL="https://shop.example.com"
//! ```

pub mod data_config;
pub mod auth_config;
pub mod gateway_config;

pub use data_config::*;
pub use auth_config::*;
pub use gateway_config::*;

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use dotenv::dotenv;
use log::{error, info, warn};

/// 전체 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub rate_limit: RateLimitConfig,
    pub avatar: AvatarStorageConfig,
    pub gateway: GatewayConfig,
}

impl AppConfig {
    /// 환경 변수로부터 전체 설정을 구성합니다.
    pub fn from_env() -> Self {
        let environment = Environment::current();

        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            password: PasswordConfig::from_env(&environment),
            rate_limit: RateLimitConfig::from_env(),
            avatar: AvatarStorageConfig::from_env(),
            gateway: GatewayConfig::from_env(),
        }
    }

    /// 환경 변수와 무관한 테스트용 설정
    ///
    /// bcrypt cost는 최소값(4)을 사용합니다.
    pub fn for_tests() -> Self {
        let environment = Environment::Test;

        Self {
            environment,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig {
                secret: "test_secret".to_string(),
                ..JwtConfig::default()
            },
            password: PasswordConfig {
                bcrypt_cost: PasswordConfig::bcrypt_cost_for_env(&environment),
            },
            rate_limit: RateLimitConfig::default(),
            avatar: AvatarStorageConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }

    /// 쿠키에 `Secure` 속성을 붙일지 여부
    pub fn cookie_secure(&self) -> bool {
        self.environment.is_production()
    }
}

/// 환경별 설정 파일을 로드합니다
///
/// PROFILE 환경변수에 따라 적절한 .env 파일을 로드합니다.
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
pub fn load_env_file() {
    let profile = env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => warn!(".env.dev 파일 로드 실패, 기본 .env 시도: {}", e),
        },
        _ => {}
    }

    // 프로필 파일에 없는 값은 기본 .env 에서 보충
    dotenv().ok();
}

/// 환경 변수 값을 읽고, 없으면 기본값을 반환합니다.
pub(crate) fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// 여러 후보 변수 중 처음으로 설정된 값을 반환합니다.
pub(crate) fn env_first(keys: &[&str], default: &str) -> String {
    keys.iter()
        .find_map(|key| env::var(key).ok())
        .unwrap_or_else(|| default.to_string())
}

/// 환경 변수를 파싱하고, 없거나 파싱에 실패하면 기본값을 사용합니다.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|e| {
            error!("{} 파싱 실패: {}. 기본값 {} 사용", key, e, default);
            default
        }),
        Err(_) => default,
    }
}
