//! Domain layer - Core business logic and entities

pub mod error;
pub mod session;
pub mod user;

pub use error::DomainError;
pub use session::{Identity, SessionClaims, SessionTokens, TokenError};
pub use user::{User, UserId, UserRepository};
