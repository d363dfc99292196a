//! `PostgreSQL` storage.
//!
//! # Table: `cart.key_value`
//!
//! - `key` - snapshot key (primary key)
//! - `value` - serialized snapshot
//! - `updated_at` - last write time
//!
//! # Migrations
//!
//! Migrations are stored in `crates/cart/migrations/` and run via:
//! ```bash
//! cargo run -p gomarketplace-cli --features postgres -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{KeyValueStore, StorageError};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `StorageError::Database` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await?;
    Ok(pool)
}

/// Run the storage migrations.
///
/// # Errors
///
/// Returns `StorageError::Migration` if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), StorageError> {
    tracing::info!("Running cart storage migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Cart storage migrations complete");
    Ok(())
}

/// Store backed by the `cart.key_value` table.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for PgStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = sqlx::query_scalar::<_, String>(
            r"
            SELECT value
            FROM cart.key_value
            WHERE key = $1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO cart.key_value (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value, updated_at = NOW()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
