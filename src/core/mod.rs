//! # Application State
//!
//! 프로세스 시작 시 한 번 구성되어 `web::Data`로 모든 핸들러와 미들웨어에
//! 공유되는 명시적 의존성 묶음입니다. 전역 레지스트리나 지연 초기화 싱글톤은
//! 사용하지 않습니다.
//!
//! ```text
//! AppConfig ─┬─► UserStore ─────────┬─► TokenService ─► AuthService
//!            ├─► RefreshTokenStore ─┘
//!            └─► AvatarStore ───────────► UserService
//! ```
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let config = AppConfig::from_env();
//! let state = AppState::with_mongo(config).await?;
//!
//! HttpServer::new(move || {
//!     App::new()
//!         .configure(|cfg| routes::configure_auth_service(cfg, web::Data::new(state.clone()), login_limit.clone()))
//! })
//! ```

use std::sync::Arc;
use log::info;
use crate::config::AppConfig;
use crate::db::Database;
use crate::errors::AppResult;
use crate::repositories::{
    InMemoryRefreshTokenStore, InMemoryUserStore, MongoRefreshTokenRepository, MongoUserRepository,
    RefreshTokenStore, UserStore,
};
use crate::services::auth::{AuthService, PasswordHasher, TokenService};
use crate::services::users::{AvatarStore, CloudinaryAvatarStore, UserService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub users: UserService,
    pub tokens: TokenService,
}

impl AppState {
    /// 저장소 구현체를 받아 서비스 그래프를 조립합니다.
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        avatars: Arc<dyn AvatarStore>,
    ) -> Self {
        let tokens = TokenService::new(config.jwt.clone(), refresh_tokens, users.clone());
        let auth = AuthService::new(
            users.clone(),
            tokens.clone(),
            PasswordHasher::new(config.password.bcrypt_cost),
            config.server.base_url.clone(),
        );
        let user_service = UserService::new(users, avatars);

        Self {
            config: Arc::new(config),
            auth,
            users: user_service,
            tokens,
        }
    }

    /// MongoDB에 연결하고 인덱스를 보장한 뒤 상태를 구성합니다.
    pub async fn with_mongo(config: AppConfig) -> AppResult<Self> {
        let database = Database::connect(&config.database).await?;

        let users = MongoUserRepository::new(&database);
        users.create_indexes().await?;
        let refresh_tokens = MongoRefreshTokenRepository::new(&database);
        refresh_tokens.create_indexes().await?;
        info!("📑 인덱스 확인 완료: {}", database.database_name());

        let avatars = CloudinaryAvatarStore::new(config.avatar.clone());

        Ok(Self::new(config, Arc::new(users), Arc::new(refresh_tokens), Arc::new(avatars)))
    }

    /// 인메모리 저장소로 구성 (테스트, DB 없는 로컬 실행)
    pub fn in_memory(config: AppConfig) -> Self {
        let avatars = CloudinaryAvatarStore::new(config.avatar.clone());

        Self::new(
            config,
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryRefreshTokenStore::new()),
            Arc::new(avatars),
        )
    }
}
