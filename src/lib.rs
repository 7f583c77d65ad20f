//! Account API
//!
//! A minimal user-account service:
//! - Registration with argon2-hashed passwords
//! - Login issuing signed, expiring session tokens
//! - A bearer-token gate in front of the profile endpoint
//! - In-memory or PostgreSQL credential storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use infrastructure::auth::JwtService;
use infrastructure::storage::StorageFactory;
use infrastructure::user::{Argon2Hasher, UserService};

/// Build the shared services from configuration
///
/// Connects to and migrates the database when the postgres backend is
/// selected.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage = config.storage_config()?;
    info!(backend = ?storage.storage_type(), "Initializing credential store");

    let repository = StorageFactory::create_user_repository(&storage).await?;
    let user_service = UserService::new(repository, Arc::new(Argon2Hasher::new()));
    info!(users = user_service.count().await?, "Credential store ready");

    let session_tokens = JwtService::new(config.jwt_config()?)?;

    Ok(AppState::new(user_service, Arc::new(session_tokens)))
}
