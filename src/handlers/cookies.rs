//! 세션 쿠키 생성
//!
//! 두 쿠키 모두 `HttpOnly`, `SameSite=Lax`, `Path=/` 이며 운영 환경에서만 `Secure`입니다.

use actix_web::cookie::{time, Cookie, SameSite};
use crate::config::AppConfig;
use crate::domain::entities::RefreshToken;
use crate::middlewares::ACCESS_TOKEN_COOKIE;

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

fn session_cookie(name: &'static str, value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(name, value)
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .max_age(time::Duration::seconds(max_age_secs))
        .finish()
}

pub fn access_cookie(token: String, config: &AppConfig) -> Cookie<'static> {
    session_cookie(
        ACCESS_TOKEN_COOKIE,
        token,
        config.jwt.access_ttl().num_seconds(),
        config.cookie_secure(),
    )
}

/// 만료 시각이 저장된 행과 일치하도록 남은 수명을 Max-Age로 씁니다.
pub fn refresh_cookie(token: &RefreshToken, config: &AppConfig) -> Cookie<'static> {
    session_cookie(
        REFRESH_TOKEN_COOKIE,
        token.token.clone(),
        token.remaining().num_seconds(),
        config.cookie_secure(),
    )
}

/// 브라우저에서 쿠키를 지우는 만료 쿠키
pub fn removal_cookie(name: &'static str, config: &AppConfig) -> Cookie<'static> {
    let mut cookie = session_cookie(name, String::new(), 0, config.cookie_secure());
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use mongodb::bson::oid::ObjectId;
    use crate::config::Environment;

    #[test]
    fn test_access_cookie_attributes() {
        let config = AppConfig::for_tests();
        let cookie = access_cookie("jwt".into(), &config);

        assert_eq!(cookie.name(), "access_token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
    }

    #[test]
    fn test_refresh_cookie_is_secure_in_production() {
        let mut config = AppConfig::for_tests();
        config.environment = Environment::Production;
        let token = RefreshToken::issue(ObjectId::new(), Duration::days(30));

        let cookie = refresh_cookie(&token, &config);

        assert_eq!(cookie.value(), token.token);
        assert_eq!(cookie.secure(), Some(true));
        assert!(cookie.max_age().unwrap() > time::Duration::days(29));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie(REFRESH_TOKEN_COOKIE, &AppConfig::for_tests());

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
