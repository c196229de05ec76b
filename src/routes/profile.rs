use axum::{extract::State, Json};
use serde_json::json;

use crate::{
    error::{AppError, Result},
    models::UpdatePasswordRequest,
    queries::user_queries,
    utils::extractors::SessionUser,
    AppState,
};

pub async fn update_password(
    State(state): State<AppState>,
    SessionUser(identity): SessionUser,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    if payload.password.is_empty() {
        return Err(AppError::BadRequest("Password required".to_string()));
    }

    if user_queries::find_by_email(&state.db, &identity.email)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    user_queries::update_password(&state.db, &identity.email, &password_hash).await?;

    Ok(Json(json!({ "success": true })))
}
