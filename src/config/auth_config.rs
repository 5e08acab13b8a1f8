//! # Authentication Configuration Module
//!
//! JWT 서명 키와 토큰 수명, 아바타 저장소 자격 증명을 관리합니다.
//!
//! ## 환경 변수
//!
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_ACCESS_TTL_DAYS="7"
//! export JWT_REFRESH_TTL_DAYS="30"
//! export EMAIL_TOKEN_TTL_HOURS="24"
//! export PASSWORD_RESET_TTL_MINUTES="60"
//!
//! export CLOUDINARY_CLOUD_NAME="demo"
//! export CLOUDINARY_API_KEY="123456789012345"
//! export CLOUDINARY_API_SECRET="abcdefghijklmnopqrstuvwxyz"
//! ```

use chrono::Duration;
use super::{env_or, env_parse};

/// JWT 및 세션 토큰 설정
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 서명 비밀키
    ///
    /// 기본값 `default_secret`은 개발 환경 전용입니다.
    pub secret: String,
    pub access_ttl_days: i64,
    pub refresh_ttl_days: i64,
    /// 이메일 인증 토큰 수명
    pub email_token_ttl_hours: i64,
    /// 비밀번호 재설정 토큰 수명
    pub reset_token_ttl_minutes: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env_or("JWT_SECRET", "default_secret");
        if secret == "default_secret" {
            log::warn!("⚠️ JWT_SECRET 이 설정되지 않아 개발용 기본 키를 사용합니다");
        }

        Self {
            secret,
            access_ttl_days: env_parse("JWT_ACCESS_TTL_DAYS", 7),
            refresh_ttl_days: env_parse("JWT_REFRESH_TTL_DAYS", 30),
            email_token_ttl_hours: env_parse("EMAIL_TOKEN_TTL_HOURS", 24),
            reset_token_ttl_minutes: env_parse("PASSWORD_RESET_TTL_MINUTES", 60),
        }
    }

    pub fn access_ttl(&self) -> Duration {
        Duration::days(self.access_ttl_days)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::days(self.refresh_ttl_days)
    }

    pub fn email_token_ttl(&self) -> Duration {
        Duration::hours(self.email_token_ttl_hours)
    }

    pub fn reset_token_ttl(&self) -> Duration {
        Duration::minutes(self.reset_token_ttl_minutes)
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "default_secret".to_string(),
            access_ttl_days: 7,
            refresh_ttl_days: 30,
            email_token_ttl_hours: 24,
            reset_token_ttl_minutes: 60,
        }
    }
}

/// Cloudinary 아바타 업로드 설정
///
/// 자격 증명이 비어 있으면 아바타 업로드는 외부 서비스 오류로 처리됩니다.
#[derive(Debug, Clone)]
pub struct AvatarStorageConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// 업로드 대상 폴더
    pub folder: String,
}

impl AvatarStorageConfig {
    pub fn from_env() -> Self {
        Self {
            cloud_name: env_or("CLOUDINARY_CLOUD_NAME", ""),
            api_key: env_or("CLOUDINARY_API_KEY", ""),
            api_secret: env_or("CLOUDINARY_API_SECRET", ""),
            folder: env_or("AVATAR_FOLDER", "user-avatars"),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }

    /// 이미지 업로드 엔드포인트 URL
    pub fn upload_url(&self) -> String {
        format!("https://api.cloudinary.com/v1_1/{}/image/upload", self.cloud_name)
    }
}

impl Default for AvatarStorageConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            folder: "user-avatars".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_default_lifetimes() {
        let config = JwtConfig::default();
        assert_eq!(config.access_ttl(), Duration::days(7));
        assert_eq!(config.refresh_ttl(), Duration::days(30));
        assert_eq!(config.email_token_ttl(), Duration::hours(24));
        assert_eq!(config.reset_token_ttl(), Duration::minutes(60));
    }

    #[test]
    fn test_avatar_storage_configured() {
        let mut config = AvatarStorageConfig::default();
        assert!(!config.is_configured());

        config.cloud_name = "demo".to_string();
        config.api_key = "key".to_string();
        config.api_secret = "secret".to_string();
        assert!(config.is_configured());
        assert_eq!(config.upload_url(), "https://api.cloudinary.com/v1_1/demo/image/upload");
    }
}
