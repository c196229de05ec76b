use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use rand::Rng;
use serde_json::json;

use crate::{
    error::{AppError, Result},
    models::{RegisterRequest, RegisterResponse, VerifyOtpRequest},
    queries::user_queries,
    AppState,
};

const OTP_TTL_MINUTES: i64 = 10;

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    validate_registration(&payload)?;

    if user_queries::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let otp = format!("{:06}", rand::rng().random_range(100000..=999999));
    let otp_expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);

    let user = user_queries::create_user(
        &state.db,
        &payload.email,
        &password_hash,
        &otp,
        otp_expires_at,
    )
    .await?;

    tracing::info!("User {} registered, awaiting verification", user.email);

    // Email delivery is out of scope; the OTP travels back in the response
    Ok(Json(RegisterResponse { success: true, otp }))
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<serde_json::Value>> {
    if payload.email.is_empty() || payload.otp.is_empty() {
        return Err(AppError::BadRequest("Email and OTP required".to_string()));
    }

    let user = user_queries::find_by_email(&state.db, &payload.email).await?;

    let user = match user {
        Some(u) if !u.is_verified => u,
        _ => {
            return Err(AppError::BadRequest(
                "Invalid user or already verified".to_string(),
            ));
        }
    };

    let otp_valid = user.otp.as_deref() == Some(payload.otp.as_str())
        && user.otp_expires_at.is_some_and(|expires| Utc::now() <= expires);

    if !otp_valid {
        return Err(AppError::BadRequest("Invalid or expired OTP".to_string()));
    }

    user_queries::mark_verified(&state.db, &payload.email).await?;

    tracing::info!("User {} verified", payload.email);

    Ok(Json(json!({ "success": true })))
}

fn validate_registration(payload: &RegisterRequest) -> Result<()> {
    if payload.email.is_empty() || !payload.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    if payload.password.len() < 4 {
        return Err(AppError::BadRequest(
            "Password must be at least 4 characters".to_string(),
        ));
    }

    Ok(())
}
