use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::{AppError, Result},
    models::{LoginRequest, LoginResponse, User},
    queries::user_queries,
    utils::session::{self, Role},
    AppState,
};

// One combined message for unknown email, unverified account and wrong
// password, so failures carry no account-enumeration signal.
const LOGIN_FAILED: &str = "Invalid credentials or not verified";

pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password required".to_string(),
        ));
    }

    let user = user_queries::find_by_email(&state.db, &payload.email)
        .await?
        .filter(|u| u.is_verified)
        .ok_or_else(|| AppError::Unauthorized(LOGIN_FAILED.to_string()))?;

    verify_password(&payload.password, &user)?;

    let role = Role::parse(&user.role)
        .ok_or_else(|| AppError::InternalError(format!("Unknown role: {}", user.role)))?;

    Ok(session_response(&user.email, role))
}

pub async fn login_admin(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    let user = user_queries::find_by_email(&state.db, &payload.email)
        .await?
        .filter(|u| u.role == Role::Admin.as_str())
        .ok_or_else(|| AppError::Unauthorized("Invalid admin credentials".to_string()))?;

    let is_valid = bcrypt::verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        return Err(AppError::Unauthorized("Invalid admin credentials".to_string()));
    }

    Ok(session_response(&user.email, Role::Admin))
}

fn verify_password(password: &str, user: &User) -> Result<()> {
    let is_valid = bcrypt::verify(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        return Err(AppError::Unauthorized(LOGIN_FAILED.to_string()));
    }

    Ok(())
}

// Returns a fully owned response so callers can borrow the email from a
// user row that goes out of scope.
fn session_response(email: &str, role: Role) -> Response {
    let cookie = session::cookie_value(email, role);

    (
        [(http::header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            email: email.to_string(),
            role: role.as_str().to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_response_outlives_the_borrowed_email() {
        let response = {
            let email = String::from("buyer@example.com");
            session_response(&email, Role::User)
        };

        let cookie = response
            .headers()
            .get(http::header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();

        assert!(cookie.starts_with("session="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn admin_session_cookie_carries_admin_role() {
        let response = session_response("admin@example.com", Role::Admin);

        let cookie = response
            .headers()
            .get(http::header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();

        let token = cookie
            .strip_prefix("session=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();

        let identity = session::decode(token).unwrap();
        assert_eq!(identity.email, "admin@example.com");
        assert_eq!(identity.role, Role::Admin);
    }
}
