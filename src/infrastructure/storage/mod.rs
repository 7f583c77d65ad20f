//! Storage infrastructure - credential store selection, pooling and migrations

mod factory;
pub mod migrations;
mod postgres;

pub use factory::{StorageConfig, StorageFactory, StorageType};
pub use migrations::{run_user_migrations, Migration, PostgresMigrator};
pub use postgres::{connect, PostgresConfig};
