//! Handlers for the `/auth` resource: register, login, verify, and the
//! admin-only password-reset flow.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use evently_core::error::CoreError;
use evently_core::roles::{ROLE_ADMIN, STATUS_BLOCKED};
use evently_core::types::Timestamp;
use evently_db::models::user::{CreateUser, User};
use evently_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_reset_token, hash_reset_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// How long a password-reset token stays valid.
const RESET_TOKEN_VALIDITY_MINS: i64 = 5;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register` and `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// Response for `GET /auth/reset-password/validate/{token}`.
#[derive(Debug, Serialize)]
pub struct ValidateTokenResponse {
    pub valid: bool,
    #[serde(rename = "expiresAt", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Create an account. New accounts get the ADMIN role (this is an internal
/// tool; PROVIDER accounts are created by an admin).
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<Json<MessageResponse>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "User already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            password_hash,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Account created");
    Ok(Json(MessageResponse::new("Account created successfully")))
}

/// POST /api/auth/login
///
/// Authenticate with email + password. Returns a long-lived access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))?;

    if user.status == STATUS_BLOCKED {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is blocked. Contact Admin.".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(AuthResponse { token, user }))
}

/// GET /api/auth/verify
///
/// Validate the caller's token and return the current account state.
pub async fn verify(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))?;
    Ok(Json(user))
}

/// POST /api/auth/forgot-password
///
/// Admin-only: issue a 5-minute reset token and email the reset link.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: 0,
        }))?;

    if user.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only Admins can use this feature".into(),
        )));
    }

    let (token, token_hash) = generate_reset_token();
    let expires = Utc::now() + chrono::Duration::minutes(RESET_TOKEN_VALIDITY_MINS);
    UserRepo::set_reset_token(&state.pool, user.id, &token_hash, expires).await?;

    let mailer = state.mailer.as_ref().ok_or_else(|| {
        AppError::InternalError("Email delivery is not configured".to_string())
    })?;
    let reset_url = format!(
        "{}/reset-password?token={token}",
        state.config.frontend_url
    );
    mailer
        .send_password_reset(&user.email, &reset_url)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to send reset email: {e}")))?;

    Ok(Json(MessageResponse::new(
        "Password reset link sent to your email",
    )))
}

/// GET /api/auth/reset-password/validate/{token}
///
/// Check whether a reset token is still valid (used by the reset form).
pub async fn validate_reset_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<ValidateTokenResponse>> {
    let token_hash = hash_reset_token(&token);
    let user =
        UserRepo::find_by_valid_reset_token(&state.pool, &token_hash, Utc::now()).await?;

    match user {
        Some(user) => Ok(Json(ValidateTokenResponse {
            valid: true,
            expires_at: user.reset_token_expires,
        })),
        None => Err(AppError::BadRequest("Invalid or expired token".into())),
    }
}

/// POST /api/auth/reset-password
///
/// Consume a valid reset token and replace the password.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    let token_hash = hash_reset_token(&input.token);
    let user = UserRepo::find_by_valid_reset_token(&state.pool, &token_hash, Utc::now())
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired token".into()))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "Password reset completed");
    Ok(Json(MessageResponse::new("Password reset successfully")))
}
