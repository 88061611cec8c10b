use actix_web::{web, HttpResponse};

use crate::api::error_response;
use crate::config::AppConfig;
use crate::database::Store;
use crate::middleware::auth::Claims;
use crate::services::auth_service::{
    self, AuthResponse, LoginRequest, RegisterRequest, RegisterResponse,
};
use crate::models::UserInfo;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Invalid email, password or name"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    db: web::Data<dyn Store>,
    config: web::Data<AppConfig>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    log::info!("📝 POST /auth/register - email: {}", request.email);

    match auth_service::register(db.get_ref(), &config, &request).await {
        Ok(user) => HttpResponse::Created().json(RegisterResponse {
            success: true,
            message: "User registered".to_string(),
            user,
        }),
        Err(e) => error_response("Registration failed", e),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "User not found")
    )
)]
pub async fn login(
    db: web::Data<dyn Store>,
    config: web::Data<AppConfig>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match auth_service::login(db.get_ref(), &config, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", response.user.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => error_response("Login failed", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid or expired token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn verify_token(claims: web::ReqData<Claims>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "valid": true,
        "user_id": claims.sub,
        "email": claims.email,
        "roles": claims.roles,
        "exp": claims.exp
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "User information retrieved", body = UserInfo),
        (status = 404, description = "User no longer exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(db: web::Data<dyn Store>, claims: web::ReqData<Claims>) -> HttpResponse {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return error_response("GET /auth/me", e),
    };

    match auth_service::get_current_user(db.get_ref(), &user_id).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": user
        })),
        Err(e) => error_response("GET /auth/me", e),
    }
}
