//! Repository for the `users` table.

use evently_core::roles::ROLE_ADMIN;
use evently_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list for users queries.
const USER_COLUMNS: &str = "id, email, password_hash, role, status, reset_token_hash, \
    reset_token_expires, created_at, updated_at";

/// Account lookup and credential-management operations.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all users, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Find a user by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the admin account to notify: the preferred email if it belongs
    /// to an admin, otherwise any admin.
    pub async fn find_admin(
        pool: &PgPool,
        preferred_email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        if let Some(email) = preferred_email {
            let query = format!(
                "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND role = $2"
            );
            let user = sqlx::query_as::<_, User>(&query)
                .bind(email)
                .bind(ROLE_ADMIN)
                .fetch_optional(pool)
                .await?;
            if user.is_some() {
                return Ok(user);
            }
        }

        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY id ASC LIMIT 1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(ROLE_ADMIN)
            .fetch_optional(pool)
            .await
    }

    /// Set the account status (ACTIVE or BLOCKED). Returns false when the
    /// user does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Change a user's email address.
    pub async fn update_email(pool: &PgPool, id: DbId, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET email = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(email)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete a user account. Returns false when the user does not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a hashed password-reset token with its expiry.
    pub async fn set_reset_token(
        pool: &PgPool,
        id: DbId,
        token_hash: &str,
        expires: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET reset_token_hash = $2, reset_token_expires = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find the user holding a still-valid reset token (by hash).
    pub async fn find_by_valid_reset_token(
        pool: &PgPool,
        token_hash: &str,
        now: Timestamp,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE reset_token_hash = $1 AND reset_token_expires > $2"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(token_hash)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Replace the password hash and clear any outstanding reset token.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET password_hash = $2, reset_token_hash = NULL,
                reset_token_expires = NULL, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(())
    }
}
