use axum::http::HeaderMap;
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{AppError, Result};

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub role: Role,
}

/// Encodes an identity as `base64("<email>:<role>")`.
///
/// This is the session token format: reversible, unsigned, forgeable by any
/// client with cookie-write access. Callers must not treat it as tamper-proof.
pub fn encode(email: &str, role: Role) -> String {
    STANDARD.encode(format!("{}:{}", email, role.as_str()))
}

/// Decodes a session token back into an identity. Splits on the first `:`,
/// so emails containing `:` do not round-trip.
///
/// A missing token is the caller's concern; every failure here means a token
/// was present but malformed.
pub fn decode(token: &str) -> Result<Identity> {
    let invalid = || AppError::Unauthorized("Invalid session".to_string());

    let bytes = STANDARD.decode(token).map_err(|_| invalid())?;
    let raw = String::from_utf8(bytes).map_err(|_| invalid())?;
    let (email, role) = raw.split_once(':').ok_or_else(invalid)?;
    let role = Role::parse(role).ok_or_else(invalid)?;

    Ok(Identity {
        email: email.to_string(),
        role,
    })
}

/// Builds the `Set-Cookie` value for a successful login.
pub fn cookie_value(email: &str, role: Role) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax",
        SESSION_COOKIE,
        encode(email, role)
    )
}

/// Pulls the raw session token out of the `Cookie` header, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(http::header::COOKIE)?.to_str().ok()?;

    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Decodes the identity from request headers. `None` when no session cookie
/// is present; `Some(Err)` when one is present but undecodable.
pub fn identity_from_headers(headers: &HeaderMap) -> Option<Result<Identity>> {
    token_from_headers(headers).map(|token| decode(&token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_email_and_role() {
        for role in [Role::User, Role::Admin] {
            let token = encode("buyer@example.com", role);
            let identity = decode(&token).unwrap();
            assert_eq!(identity.email, "buyer@example.com");
            assert_eq!(identity.role, role);
        }
    }

    #[test]
    fn token_matches_known_encoding() {
        // base64("a@b.com:user")
        assert_eq!(encode("a@b.com", Role::User), "YUBiLmNvbTp1c2Vy");
    }

    #[test]
    fn email_with_colon_does_not_round_trip() {
        // The decoder splits on the first `:`, so everything after the colon
        // in the email lands in the role field and fails role parsing.
        let token = encode("a:b@example.com", Role::User);
        assert!(decode(&token).is_err());
    }

    #[test]
    fn rejects_garbage_tokens() {
        assert!(decode("not base64!!").is_err());
        assert!(decode(&STANDARD.encode("no-colon-here")).is_err());
        assert!(decode(&STANDARD.encode("a@b.com:superuser")).is_err());
        assert!(decode("").is_err());
    }

    #[test]
    fn empty_email_decodes() {
        // Matches the encoding: the codec validates shape, not content. The
        // access gate and user lookup handle empty emails downstream.
        let identity = decode(&STANDARD.encode(":user")).unwrap();
        assert_eq!(identity.email, "");
        assert_eq!(identity.role, Role::User);
    }

    #[test]
    fn extracts_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::COOKIE,
            "theme=dark; session=abc123; lang=en".parse().unwrap(),
        );
        assert_eq!(token_from_headers(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn missing_cookie_is_distinct_from_bad_token() {
        let headers = HeaderMap::new();
        assert!(identity_from_headers(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(http::header::COOKIE, "session=!!!".parse().unwrap());
        assert!(matches!(identity_from_headers(&headers), Some(Err(_))));
    }
}
