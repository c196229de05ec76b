use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    config::AdminConfig,
    error::{AppError, Result},
    models::User,
};

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn create_user(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    otp: &str,
    otp_expires_at: DateTime<Utc>,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash, role, is_verified, otp, otp_expires_at)
         VALUES ($1, $2, 'user', FALSE, $3, $4)
         RETURNING *",
    )
    .bind(email)
    .bind(password_hash)
    .bind(otp)
    .bind(otp_expires_at)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn mark_verified(pool: &PgPool, email: &str) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users
         SET is_verified = TRUE, otp = NULL, otp_expires_at = NULL, updated_at = NOW()
         WHERE email = $1
         RETURNING *",
    )
    .bind(email)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn update_password(pool: &PgPool, email: &str, password_hash: &str) -> Result<()> {
    sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE email = $2")
        .bind(password_hash)
        .bind(email)
        .execute(pool)
        .await?;

    Ok(())
}

/// Seeds the admin account from configuration at startup. The credential
/// lives in the users table like any other account; no handler embeds it.
pub async fn ensure_admin(pool: &PgPool, admin: &AdminConfig) -> Result<()> {
    if find_by_email(pool, &admin.email).await?.is_some() {
        return Ok(());
    }

    let password_hash = bcrypt::hash(&admin.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    sqlx::query(
        "INSERT INTO users (email, password_hash, role, is_verified)
         VALUES ($1, $2, 'admin', TRUE)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(&admin.email)
    .bind(&password_hash)
    .execute(pool)
    .await?;

    tracing::info!("Seeded admin account {}", admin.email);

    Ok(())
}
