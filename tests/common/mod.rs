#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::web;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use commerce_auth::config::AppConfig;
use commerce_auth::core::AppState;
use commerce_auth::domain::{Role, TokenPurpose, User};
use commerce_auth::errors::AppResult;
use commerce_auth::middlewares::rate_limit::AUTH_LIMIT_MESSAGE;
use commerce_auth::middlewares::{ip_rate_limit, IpRateLimit};
use commerce_auth::repositories::{InMemoryRefreshTokenStore, InMemoryUserStore, UserStore};
use commerce_auth::routes::configure_auth_service;
use commerce_auth::services::users::{AvatarStore, AvatarUpload};

pub const PASSWORD: &str = "Secur3!Pass";

/// 업로드 요청을 기록하고 고정 URL을 돌려주는 아바타 저장소
#[derive(Default)]
pub struct RecordingAvatarStore {
    pub uploads: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl AvatarStore for RecordingAvatarStore {
    async fn upload(&self, user_id: &str, file: AvatarUpload) -> AppResult<String> {
        self.uploads
            .lock()
            .unwrap()
            .push((user_id.to_string(), file.content_type.clone()));
        Ok(format!("https://cdn.test/avatars/{}.png", user_id))
    }
}

pub struct Harness {
    pub state: AppState,
    pub users: Arc<InMemoryUserStore>,
    pub refresh_tokens: Arc<InMemoryRefreshTokenStore>,
    pub avatars: Arc<RecordingAvatarStore>,
}

impl Harness {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserStore::new());
        let refresh_tokens = Arc::new(InMemoryRefreshTokenStore::new());
        let avatars = Arc::new(RecordingAvatarStore::default());

        let state = AppState::new(
            AppConfig::for_tests(),
            users.clone(),
            refresh_tokens.clone(),
            avatars.clone(),
        );

        Self { state, users, refresh_tokens, avatars }
    }

    /// 인증 서비스 라우트 (로그인 제한 `login_max`회)
    pub fn routes_with_login_limit(&self, login_max: u32) -> impl FnOnce(&mut web::ServiceConfig) + use<> {
        let state = self.state.clone();
        let limit = login_limit(login_max);
        move |cfg| configure_auth_service(cfg, web::Data::new(state), limit)
    }

    pub fn routes(&self) -> impl FnOnce(&mut web::ServiceConfig) + use<> {
        self.routes_with_login_limit(500)
    }

    pub fn verification_token(&self, user_id: &str) -> String {
        let id = ObjectId::parse_str(user_id).unwrap();
        self.state
            .tokens
            .issue_action_token(&id, TokenPurpose::VerifyEmail, None)
            .unwrap()
    }

    /// 이미 인증된 계정을 저장소에 직접 넣습니다.
    pub async fn seed_verified(&self, email: &str, role: Role) -> User {
        let hash = bcrypt::hash(PASSWORD, 4).unwrap();
        let mut user = User::new("Seeded User".to_string(), email.to_string(), hash);
        user.role = role;
        user.is_verified = true;
        self.users.insert(&user).await.unwrap();
        user
    }
}

pub fn login_limit(max: u32) -> IpRateLimit {
    ip_rate_limit(Duration::from_secs(900), max, AUTH_LIMIT_MESSAGE).unwrap()
}

pub fn cookie<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}

pub fn register_body(email: &str) -> serde_json::Value {
    serde_json::json!({
        "name": "Jane Shopper",
        "email": email,
        "password": PASSWORD,
        "confirmPassword": PASSWORD,
    })
}

pub fn login_body(email: &str, password: &str) -> serde_json::Value {
    serde_json::json!({ "email": email, "password": password })
}
