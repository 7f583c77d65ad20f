//! User service for registration and authentication

use std::sync::Arc;

use tracing::debug;

use crate::domain::user::{validate_required, User, UserId, UserRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new user
#[derive(Clone)]
pub struct RegisterUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUserRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &"[hidden]")
            .finish()
    }
}

/// User service for registration and authentication
#[derive(Debug, Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Create a new user service
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user
    ///
    /// The password is hashed on the blocking pool before the user is built;
    /// the plaintext never reaches the repository.
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        for (field, value) in [
            ("email", &request.email),
            ("name", &request.name),
            ("password", &request.password),
        ] {
            validate_required(field, value).map_err(|e| DomainError::validation(e.to_string()))?;
        }

        if self.repository.email_exists(&request.email).await? {
            return Err(DomainError::duplicate_email(request.email));
        }

        let hasher = Arc::clone(&self.hasher);
        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))??;

        let user = User::new(
            UserId::generate(),
            request.name,
            request.email,
            password_hash,
        );

        self.repository.create(user).await
    }

    /// Authenticate a user with email and password
    ///
    /// Unknown emails and wrong passwords are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let Some(user) = self.repository.get_by_email(email).await? else {
            debug!("Login attempt for unknown email");
            return Err(DomainError::InvalidCredentials);
        };

        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let stored_hash = user.password_hash().to_string();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| {
                DomainError::internal(format!("Password verification task failed: {}", e))
            })?;

        if !matches {
            debug!(user_id = %user.id(), "Login attempt with wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Count registered users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}
