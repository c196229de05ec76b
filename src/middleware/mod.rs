use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::utils::{
    gate::{self, Decision},
    session,
};

/// Applies the access gate to every request before any handler runs.
///
/// A token that fails to decode counts as no identity here; only the
/// session-required API routes distinguish the two cases.
pub async fn access_gate(req: Request, next: Next) -> Response {
    let identity =
        session::identity_from_headers(req.headers()).and_then(|decoded| decoded.ok());

    let path = req.uri().path();

    match gate::decide(path, identity.as_ref()) {
        // Skip redirects that would point at the current path, so the login
        // pages stay reachable for anonymous visitors.
        Decision::Redirect(target) if target != path => {
            Redirect::temporary(target).into_response()
        }
        _ => next.run(req).await,
    }
}
