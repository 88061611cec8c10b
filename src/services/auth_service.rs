use crate::{
    config::AppConfig,
    database::UserDirectory,
    models::{User, UserInfo},
    utils::{error::AppError, validation::normalize_email},
};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,           // user _id (hex)
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
    pub aud: String,           // audience
    pub iss: String,           // issuer
}

impl Claims {
    pub fn user_id(&self) -> Result<ObjectId, AppError> {
        ObjectId::parse_str(&self.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
    }
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: UserInfo,
}

// Generate JWT token
pub fn generate_jwt(config: &AppConfig, user: &User) -> Result<String, AppError> {
    let user_id = user
        .id
        .ok_or_else(|| AppError::Internal("Cannot issue a token for an unsaved user".to_string()))?;

    let now = Utc::now();
    let expires_at = Duration::try_hours(config.jwt_expiration_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| {
            AppError::Internal(format!(
                "Invalid token lifetime: {} hours",
                config.jwt_expiration_hours
            ))
        })?;

    let claims = Claims {
        sub: user_id.to_hex(),
        email: user.email.clone(),
        name: user.name.clone(),
        roles: user.roles.clone(),
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        aud: config.jwt_audience.clone(),
        iss: config.jwt_issuer.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Verify JWT token
pub fn verify_token(config: &AppConfig, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.jwt_audience.as_str()]);
    validation.set_issuer(&[config.jwt_issuer.as_str()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Forbidden(format!("Invalid token: {}", e)))
}

// User registration
pub async fn register<D>(
    directory: &D,
    config: &AppConfig,
    request: &RegisterRequest,
) -> Result<UserInfo, AppError>
where
    D: UserDirectory + ?Sized,
{
    let email = normalize_email(&request.email, &config.allowed_email_domain)?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidRequest("Name is required".to_string()));
    }

    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if directory.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash(&request.password, config.bcrypt_cost)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    // O índice único em email cobre cadastros simultâneos
    let user = directory
        .insert_user(User::new(email, name.to_string(), password_hash))
        .await?;

    log::info!("✅ User registered successfully: {}", user.email);

    Ok(UserInfo::from(&user))
}

// User login
pub async fn login<D>(
    directory: &D,
    config: &AppConfig,
    request: &LoginRequest,
) -> Result<AuthResponse, AppError>
where
    D: UserDirectory + ?Sized,
{
    let email = normalize_email(&request.email, &config.allowed_email_domain)?;

    let user = directory
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let valid = verify(&request.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = generate_jwt(config, &user)?;

    Ok(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: UserInfo::from(&user),
    })
}

// Get current user
pub async fn get_current_user<D>(directory: &D, user_id: &ObjectId) -> Result<UserInfo, AppError>
where
    D: UserDirectory + ?Sized,
{
    let user = directory
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(UserInfo::from(&user))
}
