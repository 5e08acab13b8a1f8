//! 인터셉터 파이프라인 미들웨어
//!
//! 라우트마다 인증/인가 단계를 순서가 있는 [`Interceptor`] 목록으로 선언합니다.
//! 각 단계는 [`RequestContext`]를 받아 다음 단계로 넘기거나 요청을 거부하고,
//! 모든 단계를 통과하면 최종 컨텍스트가 request extensions에 저장됩니다.
//!
//! ```rust,ignore
//! web::resource("/profile")
//!     .wrap(Pipeline::new()
//!         .with(CookieAuthenticator::new(codec))
//!         .with(RequireVerified))
//!     .route(web::get().to(get_profile))
//! ```
//!
//! actix의 `wrap`은 나중에 등록한 미들웨어가 먼저 실행되므로, 순서가 중요한
//! 단계들은 여러 번 `wrap`하지 않고 하나의 파이프라인에 담습니다.

use std::future::{ready, Ready};
use std::rc::Rc;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;
use crate::domain::models::auth::authenticated_user::RequestContext;
use crate::errors::AppError;

/// 인터셉터 실행 결과
#[derive(Debug)]
pub enum Outcome {
    /// 갱신된 컨텍스트로 다음 단계 진행
    Continue(RequestContext),
    /// 요청 거부, 에러가 그대로 응답이 됨
    Reject(AppError),
}

/// 파이프라인의 한 단계
pub trait Interceptor {
    fn intercept(&self, req: &ServiceRequest, ctx: RequestContext) -> Outcome;
}

/// 인터셉터를 순서대로 실행하는 미들웨어
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Rc<dyn Interceptor>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.stages.push(Rc::new(interceptor));
        self
    }

    /// 모든 단계를 실행하고 최종 컨텍스트를 돌려줍니다.
    pub fn run(&self, req: &ServiceRequest, mut ctx: RequestContext) -> Result<RequestContext, AppError> {
        for stage in &self.stages {
            match stage.intercept(req, ctx) {
                Outcome::Continue(next) => ctx = next,
                Outcome::Reject(err) => return Err(err),
            }
        }
        Ok(ctx)
    }
}

impl<S, B> Transform<S, ServiceRequest> for Pipeline
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = PipelineService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PipelineService {
            service: Rc::new(service),
            pipeline: self.clone(),
        }))
    }
}

pub struct PipelineService<S> {
    service: Rc<S>,
    pipeline: Pipeline,
}

impl<S, B> Service<ServiceRequest> for PipelineService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        // 바깥 스코프의 파이프라인이 이미 채운 컨텍스트가 있으면 이어서 사용
        let initial = req
            .extensions()
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default();

        let result = self.pipeline.run(&req, initial);

        Box::pin(async move {
            match result {
                Ok(ctx) => {
                    req.extensions_mut().insert(ctx);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    log::debug!("파이프라인 거부: {} {} - {}", req.method(), req.path(), err);
                    let response = err.error_response();
                    let (req, _) = req.into_parts();
                    Ok(ServiceResponse::new(req, response).map_into_right_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};
    use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
    use crate::domain::models::auth::role::Role;

    struct Admit(Role);

    impl Interceptor for Admit {
        fn intercept(&self, _req: &ServiceRequest, _ctx: RequestContext) -> Outcome {
            Outcome::Continue(RequestContext::with_principal(AuthenticatedUser {
                user_id: "u1".into(),
                role: self.0,
                is_verified: true,
            }))
        }
    }

    struct Deny;

    impl Interceptor for Deny {
        fn intercept(&self, _req: &ServiceRequest, _ctx: RequestContext) -> Outcome {
            Outcome::Reject(AppError::AuthorizationError("nope".into()))
        }
    }

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.role.to_string())
    }

    #[actix_web::test]
    async fn test_context_reaches_handler() {
        let app = test::init_service(
            App::new().service(
                web::resource("/")
                    .wrap(Pipeline::new().with(Admit(Role::Manager)))
                    .to(whoami),
            ),
        ).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());
        assert_eq!(test::read_body(resp).await, "manager");
    }

    #[actix_web::test]
    async fn test_reject_short_circuits() {
        let app = test::init_service(
            App::new().service(
                web::resource("/")
                    .wrap(Pipeline::new().with(Deny).with(Admit(Role::Admin)))
                    .to(whoami),
            ),
        ).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), 403);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "nope");
    }

    #[actix_web::test]
    async fn test_empty_pipeline_leaves_no_principal() {
        let app = test::init_service(
            App::new().service(web::resource("/").wrap(Pipeline::new()).to(whoami)),
        ).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), 401);
    }
}
