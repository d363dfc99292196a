//! Key-value storage backends for cart snapshots.
//!
//! The store only needs two operations against a single key: read the
//! snapshot string and overwrite it. Backends:
//!
//! - [`MemoryStore`] - in-process map, nothing survives the process
//! - [`FileStore`] - JSON file on local disk
//! - [`PgStore`] - `PostgreSQL` table (feature `postgres`)
//!
//! # Example
//!
//! ```rust,ignore
//! use gomarketplace_cart::storage::{KeyValueStore, MemoryStore};
//!
//! let storage = MemoryStore::new();
//! storage.set("@GoMarketplace:cart", "[]".to_string()).await?;
//! assert_eq!(storage.get("@GoMarketplace:cart").await?.as_deref(), Some("[]"));
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::StorageConfig;

mod file;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::{PgStore, create_pool, migrate};

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage contents could not be understood.
    #[error("Corrupt storage: {0}")]
    Corrupt(String),

    /// Database operation failed.
    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Running storage migrations failed.
    #[cfg(feature = "postgres")]
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The configured backend was not compiled into this build.
    #[error("Storage backend '{0}' is not available in this build")]
    Unsupported(&'static str),
}

/// Asynchronous string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Build the backend selected by `config`.
///
/// # Errors
///
/// Returns `StorageError::Database` if the `PostgreSQL` pool cannot be
/// created, or `StorageError::Unsupported` if `postgres` is selected in a
/// build without the `postgres` feature.
pub async fn open_storage(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    match config {
        StorageConfig::Memory => {
            tracing::debug!("Using in-memory cart storage");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageConfig::File { path } => {
            tracing::debug!(path = %path.display(), "Using file cart storage");
            Ok(Arc::new(FileStore::new(path)))
        }
        #[cfg(feature = "postgres")]
        StorageConfig::Postgres { database_url } => {
            let pool = create_pool(database_url).await?;
            tracing::debug!("Using PostgreSQL cart storage");
            Ok(Arc::new(PgStore::new(pool)))
        }
        #[cfg(not(feature = "postgres"))]
        StorageConfig::Postgres { .. } => Err(StorageError::Unsupported("postgres")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_memory_storage() {
        let storage = open_storage(&StorageConfig::Memory).await.unwrap();
        assert_eq!(storage.get("missing").await.unwrap(), None);
        storage.set("k", "v".to_string()).await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_open_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let storage = open_storage(&StorageConfig::File { path: path.clone() })
            .await
            .unwrap();

        storage.set("k", "v".to_string()).await.unwrap();
        assert!(path.exists());
    }

    #[cfg(not(feature = "postgres"))]
    #[tokio::test]
    async fn test_postgres_unsupported_without_feature() {
        let config = StorageConfig::Postgres {
            database_url: secrecy::SecretString::from("postgres://localhost/cart"),
        };
        let err = open_storage(&config).await.err().unwrap();
        assert!(matches!(err, StorageError::Unsupported("postgres")));
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Unsupported("postgres");
        assert_eq!(
            err.to_string(),
            "Storage backend 'postgres' is not available in this build"
        );
    }
}
