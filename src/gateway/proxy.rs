//! 다운스트림 서비스로의 리버스 프록시
//!
//! 요청의 메서드, 전체 경로와 쿼리, 헤더, 본문을 그대로 전달하고 응답의 상태,
//! 헤더(모든 `Set-Cookie` 포함), 본문을 그대로 돌려줍니다. 연결 실패와 타임아웃은
//! 503으로 바뀌며 상세 원인은 로그에만 남습니다.

use std::time::Duration;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, error};
use crate::errors::{AppError, AppResult, ErrorContext};

/// 프록시가 전달하지 않는 연결 단위 헤더
const HOP_BY_HOP: [&str; 10] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

/// 공유 HTTP 클라이언트 생성 (요청 전체 타임아웃 포함)
pub fn build_client(timeout: Duration) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("HTTP 클라이언트 생성 실패")
}

/// 하나의 다운스트림 서비스
#[derive(Clone)]
pub struct ServiceProxy {
    name: &'static str,
    upstream: String,
    client: reqwest::Client,
}

impl ServiceProxy {
    pub fn new(name: &'static str, upstream: &str, client: reqwest::Client) -> Self {
        Self {
            name,
            upstream: upstream.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// 전체 경로와 쿼리를 유지한 대상 URL
    pub fn target_url(&self, req: &HttpRequest) -> String {
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        format!("{}{}", self.upstream, path_and_query)
    }

    pub async fn forward(&self, req: &HttpRequest, body: web::Bytes) -> AppResult<HttpResponse> {
        let url = self.target_url(req);
        let method = reqwest::Method::from_bytes(req.method().as_str().as_bytes())
            .map_err(|e| AppError::ValidationError(format!("Unsupported method: {}", e)))?;

        let mut outbound = self.client.request(method, &url);
        for (name, value) in req.headers() {
            if is_hop_by_hop(name.as_str()) || name.as_str().eq_ignore_ascii_case("x-forwarded-for") {
                continue;
            }
            outbound = outbound.header(name.as_str(), value.as_bytes());
        }
        if let Some(forwarded_for) = forwarded_for(req) {
            outbound = outbound.header("x-forwarded-for", forwarded_for);
        }

        debug!("[Gateway] {} {} → {}", req.method(), req.path(), url);

        let response = outbound.body(body).send().await.map_err(|e| {
            error!("[Gateway] {} 서비스 호출 실패 ({}): {}", self.name, url, e);
            AppError::ServiceUnavailable(format!("{}: {}", self.name, e))
        })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);

        let mut builder = HttpResponse::build(status);
        for (name, value) in response.headers() {
            if is_hop_by_hop(name.as_str()) {
                continue;
            }
            match (
                HeaderName::from_bytes(name.as_str().as_bytes()),
                HeaderValue::from_bytes(value.as_bytes()),
            ) {
                (Ok(name), Ok(value)) => {
                    builder.append_header((name, value));
                }
                _ => debug!("[Gateway] 변환할 수 없는 응답 헤더 무시: {}", name.as_str()),
            }
        }

        let bytes = response.bytes().await.map_err(|e| {
            error!("[Gateway] {} 응답 본문 수신 실패 ({}): {}", self.name, url, e);
            AppError::ServiceUnavailable(format!("{}: {}", self.name, e))
        })?;

        Ok(builder.body(bytes))
    }
}

/// 기존 `X-Forwarded-For` 뒤에 직접 연결한 주소를 덧붙입니다.
fn forwarded_for(req: &HttpRequest) -> Option<String> {
    let previous = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let peer = req.peer_addr().map(|addr| addr.ip().to_string());

    match (previous, peer) {
        (Some(prev), Some(peer)) => Some(format!("{}, {}", prev, peer)),
        (Some(prev), None) => Some(prev),
        (None, peer) => peer,
    }
}

/// 스코프에 등록된 [`ServiceProxy`]로 요청을 전달하는 핸들러
pub async fn forward(
    req: HttpRequest,
    body: web::Bytes,
    proxy: web::Data<ServiceProxy>,
) -> Result<HttpResponse, AppError> {
    proxy.forward(&req, body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn proxy() -> ServiceProxy {
        let client = build_client(Duration::from_secs(1)).unwrap();
        ServiceProxy::new("orders", "http://localhost:5003/", client)
    }

    #[test]
    fn test_target_url_keeps_full_path_and_query() {
        let req = TestRequest::get().uri("/orders/42/items?page=2&sort=desc").to_http_request();
        assert_eq!(
            proxy().target_url(&req),
            "http://localhost:5003/orders/42/items?page=2&sort=desc"
        );
    }

    #[test]
    fn test_hop_by_hop_headers() {
        assert!(is_hop_by_hop("Connection"));
        assert!(is_hop_by_hop("transfer-encoding"));
        assert!(is_hop_by_hop("Host"));
        assert!(!is_hop_by_hop("authorization"));
        assert!(!is_hop_by_hop("set-cookie"));
    }

    #[test]
    fn test_forwarded_for_appends_peer() {
        let req = TestRequest::get()
            .insert_header(("x-forwarded-for", "203.0.113.7"))
            .peer_addr("10.0.0.5:5555".parse().unwrap())
            .to_http_request();
        assert_eq!(forwarded_for(&req).as_deref(), Some("203.0.113.7, 10.0.0.5"));

        let req = TestRequest::get().to_http_request();
        assert_eq!(forwarded_for(&req), None);
    }
}
