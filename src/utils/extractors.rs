use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    error::AppError,
    utils::session::{self, Identity, Role},
};

/// Extractor for routes that require a logged-in session of any role.
///
/// Rejects with 401 when the cookie is missing or undecodable.
pub struct SessionUser(pub Identity);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = session::token_from_headers(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

        let identity = session::decode(&token)?;

        Ok(Self(identity))
    }
}

/// Extractor for admin-only routes: 401 without a session, 403 for a
/// non-admin one.
pub struct AdminUser(pub Identity);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let SessionUser(identity) = SessionUser::from_request_parts(parts, state).await?;

        if identity.role != Role::Admin {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(Self(identity))
    }
}
