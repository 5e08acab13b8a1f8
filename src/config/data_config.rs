//! 실행 환경, 서버, 데이터베이스, 비밀번호, Rate Limit 설정

use super::{env_first, env_or, env_parse};

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// `ENVIRONMENT` (없으면 `NODE_ENV`) 환경 변수로부터 현재 환경을 결정합니다.
    ///
    /// 두 변수 모두 없으면 개발 환경으로 간주합니다.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let env = Environment::current();
    /// match env {
    ///     Environment::Development => println!("개발 환경"),
    ///     Environment::Production => println!("프로덕션 환경"),
    ///     _ => {}
    /// }
    /// ```
    pub fn current() -> Self {
        Self::from_name(&env_first(&["ENVIRONMENT", "NODE_ENV"], "development"))
    }

    /// 문자열을 환경 값으로 변환합니다.
    ///
    /// 알 수 없는 값은 가장 엄격한 `Production`으로 취급합니다.
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// HTTP 서버 바인딩과 외부에 노출되는 URL 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    /// 인증 서비스 포트 (`AUTH_PORT`)
    pub auth_port: u16,
    /// 게이트웨이 포트 (`PORT`)
    pub gateway_port: u16,
    /// 인증 메일 링크 등에 사용되는 공개 URL (`BASE_URL`)
    pub base_url: String,
    /// CORS 허용 오리진 (`FRONTEND_URL`)
    pub frontend_url: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            auth_port: env_parse("AUTH_PORT", 5001),
            gateway_port: env_parse("PORT", 8080),
            base_url: env_or("BASE_URL", "http://localhost:5001"),
            frontend_url: env_or("FRONTEND_URL", "http://localhost:3000"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            auth_port: 5001,
            gateway_port: 8080,
            base_url: "http://localhost:5001".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
        }
    }
}

/// MongoDB 연결 설정
///
/// ## 환경 변수
/// - `MONGO_URI` (또는 `MONGODB_URI`): 연결 URI
/// - `DATABASE_NAME`: 데이터베이스 이름
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            uri: env_first(&["MONGO_URI", "MONGODB_URI"], "mongodb://localhost:27017"),
            name: env_or("DATABASE_NAME", "ecommerce_auth"),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            name: "ecommerce_auth_test".to_string(),
        }
    }
}

/// 비밀번호 해싱 설정
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    pub bcrypt_cost: u32,
}

impl PasswordConfig {
    /// `BCRYPT_COST` 값을 읽고, 없으면 환경별 기본값을 사용합니다.
    ///
    /// bcrypt가 허용하는 4-31 범위를 벗어나면 환경별 기본값으로 되돌립니다.
    pub fn from_env(env: &Environment) -> Self {
        let fallback = Self::bcrypt_cost_for_env(env);
        let cost = env_parse("BCRYPT_COST", fallback);
        let bcrypt_cost = if (4..=31).contains(&cost) {
            cost
        } else {
            log::warn!("BCRYPT_COST {} 는 허용 범위(4-31)를 벗어났습니다. 기본값 {} 사용", cost, fallback);
            fallback
        };

        Self { bcrypt_cost }
    }

    /// 환경별 기본 bcrypt cost
    ///
    /// 개발/테스트 환경에서는 빠른 해싱을, 프로덕션에서는 높은 보안을 우선합니다.
    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// IP 기반 요청 제한 설정
///
/// 두 리미터 모두 같은 윈도우(`RATE_LIMIT_WINDOW_SECS`)를 공유합니다.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    /// 전역 리미터의 윈도우당 최대 요청 수
    pub general_max: u32,
    /// 로그인 리미터의 윈도우당 최대 요청 수
    pub auth_max: u32,
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        Self {
            window_secs: env_parse("RATE_LIMIT_WINDOW_SECS", 15 * 60),
            general_max: env_parse("GENERAL_RATE_LIMIT_MAX", 100),
            auth_max: env_parse("AUTH_RATE_LIMIT_MAX", 500),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 15 * 60,
            general_max: 100,
            auth_max: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_name() {
        assert_eq!(Environment::from_name("dev"), Environment::Development);
        assert_eq!(Environment::from_name("Development"), Environment::Development);
        assert_eq!(Environment::from_name("testing"), Environment::Test);
        assert_eq!(Environment::from_name("stage"), Environment::Staging);
        assert_eq!(Environment::from_name("production"), Environment::Production);
        assert_eq!(Environment::from_name("something-else"), Environment::Production);
    }

    #[test]
    fn test_bcrypt_cost_for_env() {
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Development), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Test), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Staging), 10);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Production), 12);
    }

    #[test]
    fn test_rate_limit_defaults() {
        let config = RateLimitConfig::default();
        assert_eq!(config.window_secs, 900);
        assert_eq!(config.general_max, 100);
        assert_eq!(config.auth_max, 500);
    }
}
