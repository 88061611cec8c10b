use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::config::AppConfig;
use crate::services::auth_service;
use crate::utils::error::AppError;

pub use crate::services::auth_service::Claims;

/// Exige `Authorization: Bearer <jwt>` e disponibiliza as claims via `web::ReqData<Claims>`
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

/// `None` se não há token; `Some(Err)` se o header usa outro esquema que não `Bearer`
fn bearer_token(req: &ServiceRequest) -> Option<Result<&str, AppError>> {
    let header = req.headers().get("Authorization")?.to_str().ok()?;
    let mut parts = header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;

    if scheme.eq_ignore_ascii_case("bearer") {
        Some(Ok(token))
    } else {
        Some(Err(AppError::Forbidden(format!("Unsupported scheme {}", scheme))))
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<AppConfig>>().cloned() else {
            return Box::pin(async {
                Err(AppError::Internal("AppConfig not registered".to_string()).into())
            });
        };

        let claims = match bearer_token(&req) {
            Some(token) => token.and_then(|token| auth_service::verify_token(&config, token)),
            None => Err(AppError::Unauthorized(
                "Access denied. No token provided.".to_string(),
            )),
        };

        match claims {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res)
                })
            }
            Err(e) => {
                log::warn!("🔒 {} {} rejected: {}", req.method(), req.path(), e);
                let err = match e {
                    AppError::Forbidden(_) => AppError::Forbidden("Invalid token.".to_string()),
                    other => other,
                };
                Box::pin(async move { Err(err.into()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use actix_web::{http::StatusCode, test, App, HttpResponse};
    use mongodb::bson::oid::ObjectId;

    async fn whoami(claims: web::ReqData<Claims>) -> HttpResponse {
        HttpResponse::Ok().body(claims.email.clone())
    }

    fn token_for(config: &AppConfig) -> String {
        let mut user = User::new("alice@mytru.ca".into(), "Alice".into(), "hash".into());
        user.id = Some(ObjectId::new());
        auth_service::generate_jwt(config, &user).unwrap()
    }

    #[actix_web::test]
    async fn test_bearer_token_required() {
        let config = AppConfig::for_tests();
        let token = token_for(&config);

        let app = test::init_service(
            App::new().app_data(web::Data::new(config)).service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/me").to_request();
        let res = test::try_call_service(&app, req).await;
        assert_eq!(
            res.err().unwrap().as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        );

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", "Bearer garbage"))
            .to_request();
        let res = test::try_call_service(&app, req).await;
        assert_eq!(
            res.err().unwrap().as_response_error().status_code(),
            StatusCode::FORBIDDEN
        );

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, web::Bytes::from_static(b"alice@mytru.ca"));
    }

    #[actix_web::test]
    async fn test_authorization_scheme() {
        let config = AppConfig::for_tests();
        let token = token_for(&config);

        let app = test::init_service(
            App::new().app_data(web::Data::new(config)).service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("bearer {}", token)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, web::Bytes::from_static(b"alice@mytru.ca"));

        // Token presente com outro esquema: inválido, não ausente
        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Token {}", token)))
            .to_request();
        let res = test::try_call_service(&app, req).await;
        assert_eq!(
            res.err().unwrap().as_response_error().status_code(),
            StatusCode::FORBIDDEN
        );

        // Só o esquema, sem token
        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", "Bearer"))
            .to_request();
        let res = test::try_call_service(&app, req).await;
        assert_eq!(
            res.err().unwrap().as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
