//! Bearer-token gate for session-protected routes

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{DomainError, SessionClaims};

const BEARER_PREFIX: &str = "Bearer ";

/// Claims of the verified session attached to the current request
///
/// Only available behind [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionClaims);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionClaims>()
            .cloned()
            .map(CurrentSession)
            .ok_or_else(|| DomainError::MissingToken.into())
    }
}

/// Verify the bearer token and attach its claims to the request
///
/// Rejects with 401 before the handler runs when the header is missing,
/// uses another scheme, or carries a token that fails verification.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())?;

    let claims = state
        .session_tokens
        .verify(token)
        .map_err(DomainError::from)?;

    debug!(user_id = %claims.user_id(), "Session verified");

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// The token is everything after the prefix, untrimmed.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, DomainError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(DomainError::MissingToken)?;

    let value = value.to_str().map_err(|_| DomainError::Unauthorized)?;

    value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(DomainError::Unauthorized)
}
