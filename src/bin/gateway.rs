//! API 게이트웨이 실행 파일
//!
//! 데이터베이스 없이 설정만으로 구동됩니다.

use std::io;
use actix_cors::Cors;
use actix_governor::Governor;
use actix_web::http::header;
use actix_web::{middleware, App, HttpServer};
use env_logger::Env;
use log::{error, info};
use commerce_auth::config::{load_env_file, AppConfig};
use commerce_auth::gateway::Gateway;
use commerce_auth::middlewares::RateLimiters;

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));

    info!("🚀 API 게이트웨이 시작중...");

    let config = AppConfig::from_env();
    let gateway = Gateway::from_config(&config).map_err(|e| {
        error!("게이트웨이 초기화 실패: {}", e);
        io::Error::other(e.to_string())
    })?;
    let limiters = RateLimiters::from_config(&config.rate_limit)
        .map_err(|e| io::Error::other(e.to_string()))?;

    let bind_address = (config.server.host.clone(), config.server.gateway_port);
    let frontend_url = config.server.frontend_url.clone();

    info!("🌐 게이트웨이가 http://{}:{} 에서 실행중입니다", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Governor::new(&limiters.general))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(|cfg| gateway.configure(cfg))
    })
        .bind(bind_address)?
        .run()
        .await
}
