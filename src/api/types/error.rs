//! API error responses
//!
//! Every error body has the shape `{"error": "<message>"}`. Failures of the
//! three account endpoints all answer 401; internal details stay in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::DomainError;

pub const MISSING_TOKEN_MESSAGE: &str = "Access Token is required";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid Access Token";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Identifiant invalid";
pub const NOT_FOUND_MESSAGE: &str = "The requested URL was not found on the server.";
const STORE_FAILURE_MESSAGE: &str = "Unable to process the request";

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: message.into(),
            },
        }
    }

    /// Authentication error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Request took longer than the configured limit
    pub fn timeout() -> Self {
        Self::new(StatusCode::REQUEST_TIMEOUT, "Request timed out")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        if err.is_auth_failure() {
            debug!(error = %err, "Rejected access token");
        }

        match &err {
            DomainError::MissingToken => Self::unauthorized(MISSING_TOKEN_MESSAGE),
            DomainError::Unauthorized | DomainError::InvalidToken(_) => {
                Self::unauthorized(INVALID_TOKEN_MESSAGE)
            }
            DomainError::InvalidCredentials => Self::unauthorized(INVALID_CREDENTIALS_MESSAGE),
            DomainError::DuplicateEmail { .. } | DomainError::Validation { .. } => {
                Self::unauthorized(err.to_string())
            }
            DomainError::Configuration { .. }
            | DomainError::Storage { .. }
            | DomainError::Internal { .. } => {
                error!(error = %err, "Request failed");
                Self::unauthorized(STORE_FAILURE_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TokenError;

    impl ApiError {
        pub(crate) fn message(&self) -> &str {
            &self.response.error
        }
    }

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::new(StatusCode::BAD_REQUEST, "Invalid JSON");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Invalid JSON");
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::unauthorized(INVALID_TOKEN_MESSAGE);
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json, serde_json::json!({ "error": "Invalid Access Token" }));
    }

    #[test]
    fn test_token_errors_are_indistinguishable() {
        let messages: Vec<String> = [
            DomainError::Unauthorized,
            DomainError::InvalidToken(TokenError::Malformed),
            DomainError::InvalidToken(TokenError::InvalidSignature),
            DomainError::InvalidToken(TokenError::Expired),
        ]
        .into_iter()
        .map(|e| {
            let api: ApiError = e.into();
            assert_eq!(api.status, StatusCode::UNAUTHORIZED);
            api.response.error
        })
        .collect();

        assert!(messages.iter().all(|m| m == INVALID_TOKEN_MESSAGE));
    }

    #[test]
    fn test_domain_error_conversion() {
        let missing: ApiError = DomainError::MissingToken.into();
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing.message(), MISSING_TOKEN_MESSAGE);

        let credentials: ApiError = DomainError::InvalidCredentials.into();
        assert_eq!(credentials.message(), INVALID_CREDENTIALS_MESSAGE);

        let duplicate: ApiError = DomainError::duplicate_email("user@email.com").into();
        assert_eq!(duplicate.status, StatusCode::UNAUTHORIZED);
        assert!(duplicate.message().contains("already registered"));
    }

    #[test]
    fn test_storage_details_are_not_exposed() {
        let err: ApiError = DomainError::storage("password authentication failed for db").into();

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert!(!err.message().contains("db"));
    }
}
