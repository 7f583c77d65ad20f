//! User domain
//!
//! This module provides domain types and traits for user accounts,
//! including the user entity, validation, and the credential store trait.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId};
pub use repository::UserRepository;
pub use validation::{validate_required, validate_user_id, UserValidationError};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
