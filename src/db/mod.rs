//! Database Connection Management Module
//!
//! MongoDB 연결을 관리합니다. 연결 정보는 [`DatabaseConfig`]로 전달받습니다.
//!
//! # 기본 사용법
//!
//! ```rust,ignore
//! use commerce_auth::config::AppConfig;
//! use commerce_auth::db::Database;
//!
//! let config = AppConfig::from_env();
//! let database = Database::connect(&config.database).await?;
//! let users = database.get_database().collection::<User>("users");
//! ```

use mongodb::{bson::doc, options::ClientOptions, Client};
use log::info;
use crate::config::DatabaseConfig;
use crate::errors::{AppError, AppResult};

/// MongoDB 데이터베이스 연결 래퍼
#[derive(Clone)]
pub struct Database {
    /// MongoDB 클라이언트 인스턴스
    client: Client,
    /// 사용할 데이터베이스 이름
    database_name: String,
}

impl Database {
    /// 새 MongoDB 데이터베이스 연결을 생성합니다.
    ///
    /// 연결 직후 `ping` 명령으로 서버 응답을 확인합니다.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&config.uri).await?;

        // 애플리케이션 이름 설정 (모니터링 및 로깅에 유용)
        client_options.app_name = Some("commerce_auth".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(&config.name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(format!("MongoDB ping 실패: {}", e)))?;

        info!("✅ MongoDB 연결 성공: {}", config.name);

        Ok(Self {
            client,
            database_name: config.name.clone(),
        })
    }

    /// MongoDB 데이터베이스 인스턴스를 반환합니다.
    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    /// 데이터베이스 이름을 반환합니다.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
