use serde::Deserialize;

use crate::domain::session::{DEFAULT_TOKEN_TTL_SECONDS, MAX_TOKEN_TTL_SECONDS};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtConfig;
use crate::infrastructure::storage::{PostgresConfig, StorageConfig, StorageType};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on the handling time of a single request
    pub request_timeout_secs: u64,
    /// Answer CORS requests from any origin
    pub cors_allow_any_origin: bool,
    /// Directory served for paths no route matches
    pub static_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Symmetric key used to sign and verify session tokens
    pub secret: String,
    pub token_ttl_seconds: u64,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_secs: 30,
            cors_allow_any_origin: true,
            static_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[hidden]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: 5,
        }
    }
}

impl std::fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageSettings")
            .field("backend", &self.backend)
            .field("database_url", &self.database_url.as_ref().map(|_| "[hidden]"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from files and `APP__*` environment variables
    ///
    /// The unprefixed `SECRET` and `DATABASE_URL` variables fill in values
    /// left unset by the other sources.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;

        Ok(config.with_fallbacks(|key| std::env::var(key).ok()))
    }

    /// Fill unset secret and database URL from a variable lookup
    pub fn with_fallbacks(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.auth.secret.is_empty() {
            if let Some(secret) = lookup("SECRET") {
                self.auth.secret = secret;
            }
        }

        if self.storage.database_url.is_none() {
            self.storage.database_url = lookup("DATABASE_URL");
        }

        self
    }

    /// Token settings, rejecting a missing secret or an unusable lifetime
    pub fn jwt_config(&self) -> Result<JwtConfig, DomainError> {
        if self.auth.secret.trim().is_empty() {
            return Err(DomainError::configuration(
                "A token signing secret is required (APP__AUTH__SECRET or SECRET)",
            ));
        }

        if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&self.auth.token_ttl_seconds) {
            return Err(DomainError::configuration(format!(
                "auth.token_ttl_seconds must be between 1 and {}",
                MAX_TOKEN_TTL_SECONDS
            )));
        }

        Ok(JwtConfig::new(
            self.auth.secret.clone(),
            self.auth.token_ttl_seconds,
        ))
    }

    /// Credential store selection
    pub fn storage_config(&self) -> Result<StorageConfig, DomainError> {
        let backend = StorageType::from_str(&self.storage.backend).ok_or_else(|| {
            DomainError::configuration(format!(
                "Unknown storage backend '{}'",
                self.storage.backend
            ))
        })?;

        match backend {
            StorageType::InMemory => Ok(StorageConfig::in_memory()),
            StorageType::Postgres => {
                let url = self.storage.database_url.clone().ok_or_else(|| {
                    DomainError::configuration(
                        "The postgres backend requires a database URL (APP__STORAGE__DATABASE_URL or DATABASE_URL)",
                    )
                })?;

                Ok(StorageConfig::Postgres(
                    PostgresConfig::new(url).with_max_connections(self.storage.max_connections),
                ))
            }
        }
    }
}
