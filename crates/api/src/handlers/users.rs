//! Admin user management and self-service profile handlers, mounted under
//! `/auth` alongside the credential endpoints.

use axum::extract::{Path, State};
use axum::Json;
use evently_core::error::CoreError;
use evently_core::roles::{ROLE_ADMIN, ROLE_PROVIDER, STATUS_ACTIVE, STATUS_BLOCKED};
use evently_core::types::DbId;
use evently_db::models::user::{CreateUser, User};
use evently_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::MessageResponse;
use crate::state::AppState;

const MIN_PASSWORD_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/create-user`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub password: String,
    /// Defaults to PROVIDER; admins are created explicitly.
    pub role: Option<String>,
}

/// Request body for `PUT /auth/users/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Request body for `PUT /auth/users/{id}/password`.
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub password: String,
}

/// Request body for `PUT /auth/profile/email`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmailRequest {
    pub current_password: String,
    #[validate(email(message = "A valid email address is required"))]
    pub new_email: String,
}

/// Request body for `PUT /auth/profile/password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Admin user management
// ---------------------------------------------------------------------------

/// GET /api/auth/users
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<User>>> {
    let users = UserRepo::list_all(&state.pool).await?;
    Ok(Json(users))
}

/// POST /api/auth/create-user
///
/// Admin creates an account directly; the role defaults to PROVIDER.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<Json<MessageResponse>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    let role = input.role.unwrap_or_else(|| ROLE_PROVIDER.to_string());
    if role != ROLE_ADMIN && role != ROLE_PROVIDER {
        return Err(AppError::BadRequest(format!(
            "Role must be {ROLE_ADMIN} or {ROLE_PROVIDER}"
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            password_hash,
            role,
        },
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        created_by = admin.user_id,
        "User created"
    );
    Ok(Json(MessageResponse::new("User created successfully")))
}

/// PUT /api/auth/users/{id}/status
///
/// Block or unblock an account. Blocking takes effect on the user's next
/// request because every authenticated route re-checks the user row.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<MessageResponse>> {
    if input.status != STATUS_ACTIVE && input.status != STATUS_BLOCKED {
        return Err(AppError::BadRequest(format!(
            "Status must be {STATUS_ACTIVE} or {STATUS_BLOCKED}"
        )));
    }
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "You cannot change your own status".into(),
        ));
    }

    let updated = UserRepo::update_status(&state.pool, id, &input.status).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    tracing::info!(user_id = id, status = %input.status, changed_by = admin.user_id, "User status updated");
    Ok(Json(MessageResponse::new("User status updated")))
}

/// DELETE /api/auth/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".into(),
        ));
    }

    let deleted = UserRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    tracing::info!(user_id = id, deleted_by = admin.user_id, "User deleted");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// PUT /api/auth/users/{id}/password
///
/// Admin sets a user's password without knowing the old one.
pub async fn set_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<SetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    if UserRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, id, &password_hash).await?;

    tracing::info!(user_id = id, changed_by = admin.user_id, "Password set by admin");
    Ok(Json(MessageResponse::new("Password updated successfully")))
}

// ---------------------------------------------------------------------------
// Self-service profile
// ---------------------------------------------------------------------------

/// PUT /api/auth/profile/email
///
/// Change the caller's own email after re-verifying their password.
pub async fn update_own_email(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateEmailRequest>,
) -> AppResult<Json<MessageResponse>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    verify_current_password(&state, user.user_id, &input.current_password).await?;

    // Duplicate email surfaces as 409 via the unique constraint.
    UserRepo::update_email(&state.pool, user.user_id, &input.new_email).await?;

    tracing::info!(user_id = user.user_id, "Email updated");
    Ok(Json(MessageResponse::new("Email updated successfully")))
}

/// PUT /api/auth/profile/password
///
/// Change the caller's own password after re-verifying the current one.
pub async fn update_own_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdatePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    verify_current_password(&state, user.user_id, &input.current_password).await?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.user_id, &password_hash).await?;

    tracing::info!(user_id = user.user_id, "Password updated");
    Ok(Json(MessageResponse::new("Password updated successfully")))
}

async fn verify_current_password(
    state: &AppState,
    user_id: DbId,
    current_password: &str,
) -> AppResult<()> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))?;

    let matches = verify_password(current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !matches {
        return Err(AppError::BadRequest("Incorrect current password".into()));
    }
    Ok(())
}
