//! Storage factory for runtime credential store selection

use std::sync::Arc;

use crate::domain::user::UserRepository;
use crate::domain::DomainError;
use crate::infrastructure::user::{InMemoryUserRepository, PostgresUserRepository};

use super::migrations::run_user_migrations;
use super::postgres::{connect, PostgresConfig};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Creates an in-memory storage configuration
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Factory for creating credential stores
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the user repository described by the configuration
    ///
    /// PostgreSQL stores are migrated before they are returned.
    pub async fn create_user_repository(
        config: &StorageConfig,
    ) -> Result<Arc<dyn UserRepository>, DomainError> {
        match config {
            StorageConfig::InMemory => Ok(Arc::new(InMemoryUserRepository::new())),
            StorageConfig::Postgres(pg_config) => {
                let pool = connect(pg_config).await?;
                run_user_migrations(&pool).await?;
                Ok(Arc::new(PostgresUserRepository::new(pool)))
            }
        }
    }
}
