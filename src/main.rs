//! 커머스 인증 서비스 메인 애플리케이션
//!
//! 설정을 읽고 MongoDB 저장소로 서비스 그래프를 조립한 뒤 Actix-web 서버를 구동합니다.

use std::io;
use actix_cors::Cors;
use actix_governor::Governor;
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};
use commerce_auth::config::{load_env_file, AppConfig};
use commerce_auth::core::AppState;
use commerce_auth::middlewares::RateLimiters;
use commerce_auth::routes::configure_auth_service;

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 커머스 인증 서비스 시작중...");

    let config = AppConfig::from_env();
    let bind_address = (config.server.host.clone(), config.server.auth_port);
    let frontend_url = config.server.frontend_url.clone();

    info!("📡 데이터베이스 연결 중...");
    let state = AppState::with_mongo(config).await.map_err(|e| {
        error!("서비스 초기화 실패: {}", e);
        io::Error::other(e.to_string())
    })?;
    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    // 워커 간에 카운터를 공유하도록 서버 바깥에서 생성
    let limiters = RateLimiters::from_config(&state.config.rate_limit)
        .map_err(|e| io::Error::other(e.to_string()))?;

    info!("🌐 서버가 http://{}:{} 에서 실행중입니다", bind_address.0, bind_address.1);
    info!("📍 Health check: http://{}:{}/health", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&limiters.general))
            .wrap(configure_cors(&frontend_url))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(|cfg| {
                configure_auth_service(cfg, web::Data::new(state.clone()), limiters.auth.clone())
            })
    })
        .bind(bind_address)?
        .run()
        .await
}

/// 로깅 시스템을 초기화합니다
///
/// `RUST_LOG`가 없으면 `info,actix_web=info`를 사용합니다.
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

/// 프론트엔드 오리진만 허용하고 쿠키 전송을 허용하는 CORS
fn configure_cors(frontend_url: &str) -> Cors {
    Cors::default()
        .allowed_origin(frontend_url)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}
