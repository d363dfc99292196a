//! Storage migration command.
//!
//! # Usage
//!
//! ```bash
//! CART_STORAGE_BACKEND=postgres CART_DATABASE_URL=postgres://... gm-cart migrate
//! ```
//!
//! # Migration Files
//!
//! Cart storage migrations: `crates/cart/migrations/`

use gomarketplace_cart::storage::{self, StorageError};
use gomarketplace_cart::{CartConfig, StorageConfig};
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The configured backend has no migrations.
    #[error("CART_STORAGE_BACKEND must be 'postgres' to run migrations (got {0})")]
    NotPostgres(&'static str),

    /// Connecting or migrating failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Run the cart storage migrations against the configured database.
///
/// # Errors
///
/// Returns an error if the backend is not `postgres`, or the database is
/// unreachable, or a migration fails.
pub async fn run(config: &CartConfig) -> Result<(), MigrationError> {
    let database_url = match &config.storage {
        StorageConfig::Postgres { database_url } => database_url,
        StorageConfig::Memory => return Err(MigrationError::NotPostgres("memory")),
        StorageConfig::File { .. } => return Err(MigrationError::NotPostgres("file")),
    };

    tracing::info!("Connecting to cart database...");
    let pool = storage::create_pool(database_url).await?;

    storage::migrate(&pool).await?;
    Ok(())
}
