use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{error, warn};

use pawfectly_core::CoreError;
use pawfectly_types::api::{Claims, LoginRequest, LoginResponse, SignupRequest, SignupResponse};
use pawfectly_types::models::UserId;

use crate::AppState;
use crate::error::ApiError;

const MIN_PASSWORD_LEN: usize = 8;
const TOKEN_TTL_DAYS: i64 = 30;

pub async fn signup(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<SignupRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Password hashing failed: {}", e);
            ApiError::Internal
        })?
        .to_string();

    let user_id = state
        .services
        .profiles
        .create_account(req.email, password_hash)
        .await
        .map_err(|e| match e {
            CoreError::Conflict(_) => ApiError::Conflict("email is already registered".into()),
            other => other.into(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".into(),
            user_id,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<Json<LoginResponse>, ApiError> {
    let account = state
        .services
        .profiles
        .account_by_email(req.email.clone())
        .await?
        .ok_or_else(|| {
            warn!("Login attempt for unknown email");
            ApiError::Unauthorized("invalid credentials".into())
        })?;

    let parsed_hash = PasswordHash::new(&account.password_hash).map_err(|e| {
        error!("Stored hash for user {} is unreadable: {}", account.user_id, e);
        ApiError::Internal
    })?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized("invalid credentials".into()))?;

    let token = create_token(&state.jwt_secret, account.user_id, req.email.trim()).map_err(|e| {
        error!("Token encoding failed: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        user_id: account.user_id,
        pet_type: account.pet_type,
        image: account.image,
        token,
    }))
}

pub fn create_token(
    secret: &str,
    user_id: UserId,
    email: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
