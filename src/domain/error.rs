use thiserror::Error;

use super::session::TokenError;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Access token is missing")]
    MissingToken,

    #[error("Unsupported authorization scheme")]
    Unauthorized,

    #[error("Invalid access token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email '{email}' is already registered")]
    DuplicateEmail { email: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for failures of the authentication gate itself
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingToken | Self::Unauthorized | Self::InvalidToken(_)
        )
    }
}
