//! User infrastructure module
//!
//! Credential store implementations (in-memory and PostgreSQL), Argon2
//! password hashing, and the user service composing them.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{RegisterUserRequest, UserService};
