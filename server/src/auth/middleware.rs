//! Authentication extractor.
//!
//! Session management lives in the upstream API. This extractor only reads
//! the caller's bearer token (forwarded upstream untouched) and the role
//! header, and turns them into an explicit [`AccessContext`].

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use campus_engine::{AccessContext, Role};

use crate::AppState;

/// Header carrying the caller's role (`administrador`, `maestro`, `alumno`).
pub const ROLE_HEADER: &str = "x-user-role";

/// Authenticated user extracted from request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AccessContext);

impl AuthUser {
    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn token(&self) -> Option<&str> {
        self.0.token.as_deref()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        {
            Some(header) if header.starts_with("Bearer ") => {
                let token = header.trim_start_matches("Bearer ").trim().to_string();
                if token.is_empty() {
                    return Err((StatusCode::UNAUTHORIZED, "Empty bearer token"));
                }
                Some(token)
            }
            Some(_) => {
                return Err((
                    StatusCode::UNAUTHORIZED,
                    "Invalid authorization header format",
                ))
            }
            None if state.config.auth_required => {
                return Err((StatusCode::UNAUTHORIZED, "Missing authorization header"))
            }
            None => None,
        };

        let role = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Missing role header"))?
            .parse::<Role>()
            .map_err(|_| (StatusCode::FORBIDDEN, "Unknown role"))?;

        Ok(AuthUser(AccessContext::new(role, token)))
    }
}
