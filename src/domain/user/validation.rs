//! User validation utilities
//!
//! Registration fields are required but deliberately not format-checked:
//! an email only has to be present, uniqueness is left to the store.

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID cannot be empty")]
    EmptyId,

    #[error("User ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("User ID contains invalid character: '{0}'. Only alphanumeric characters and hyphens are allowed")]
    InvalidIdCharacter(char),

    #[error("Field '{0}' is required")]
    MissingField(&'static str),
}

const MAX_USER_ID_LENGTH: usize = 64;

/// Validate a user ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 64 characters
/// - Only alphanumeric characters and hyphens
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    if id.is_empty() {
        return Err(UserValidationError::EmptyId);
    }

    if id.len() > MAX_USER_ID_LENGTH {
        return Err(UserValidationError::IdTooLong(MAX_USER_ID_LENGTH));
    }

    if let Some(c) = id.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
        return Err(UserValidationError::InvalidIdCharacter(c));
    }

    Ok(())
}

/// Validate that a required field carries a value
pub fn validate_required(field: &'static str, value: &str) -> Result<(), UserValidationError> {
    if value.trim().is_empty() {
        return Err(UserValidationError::MissingField(field));
    }

    Ok(())
}
