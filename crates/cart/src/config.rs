//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_BACKEND` - `memory`, `file` or `postgres` (default: file)
//! - `CART_STORAGE_PATH` - Storage file for the `file` backend
//!   (default: gomarketplace-storage.json)
//! - `CART_STORAGE_KEY` - Key the snapshot is stored under
//!   (default: @GoMarketplace:cart)
//! - `CART_WRITE_POLICY` - `write-through` or `write-behind` (default: write-through)
//! - `CART_WRITE_BEHIND_MS` - Coalescing window for `write-behind` (default: 250)
//!
//! ## Required for the `postgres` backend
//! - `CART_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::persister::WritePolicy;
use crate::store::StoreOptions;

/// Key the cart snapshot lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketplace:cart";

const DEFAULT_STORAGE_PATH: &str = "gomarketplace-storage.json";
const DEFAULT_WRITE_BEHIND_MS: u64 = 250;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Where snapshots are kept
    pub storage: StorageConfig,
    /// Key the snapshot is stored under
    pub storage_key: String,
    /// When snapshots are written
    pub write_policy: WritePolicy,
}

/// Storage backend selection.
///
/// Implements `Debug` manually to redact the database URL.
#[derive(Clone)]
pub enum StorageConfig {
    /// In-process map; nothing survives the process.
    Memory,
    /// JSON file on local disk.
    File { path: PathBuf },
    /// `PostgreSQL` table (requires the `postgres` feature).
    Postgres { database_url: SecretString },
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("Memory"),
            Self::File { path } => f.debug_struct("File").field("path", path).finish(),
            Self::Postgres { .. } => f
                .debug_struct("Postgres")
                .field("database_url", &"[REDACTED]")
                .finish(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or the `postgres`
    /// backend is selected without a database URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`CartConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("CART_STORAGE_BACKEND").unwrap_or_else(|| "file".to_string());
        let storage = match backend.trim().to_ascii_lowercase().as_str() {
            "memory" => StorageConfig::Memory,
            "file" => StorageConfig::File {
                path: PathBuf::from(
                    lookup("CART_STORAGE_PATH").unwrap_or_else(|| DEFAULT_STORAGE_PATH.to_string()),
                ),
            },
            "postgres" => StorageConfig::Postgres {
                database_url: get_database_url(&lookup, "CART_DATABASE_URL")?,
            },
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "CART_STORAGE_BACKEND".to_string(),
                    format!("unknown backend '{other}' (expected memory, file or postgres)"),
                ));
            }
        };

        let storage_key =
            lookup("CART_STORAGE_KEY").unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let write_policy = parse_write_policy(&lookup)?;

        Ok(Self {
            storage,
            storage_key,
            write_policy,
        })
    }

    /// Store options derived from this configuration.
    #[must_use]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            storage_key: self.storage_key.clone(),
            write_policy: self.write_policy,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url<F>(lookup: &F, primary_key: &str) -> Result<SecretString, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(primary_key)
        .or_else(|| lookup("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
}

fn parse_write_policy<F>(lookup: &F) -> Result<WritePolicy, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let window_ms = match lookup("CART_WRITE_BEHIND_MS") {
        Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
            ConfigError::InvalidEnvVar("CART_WRITE_BEHIND_MS".to_string(), e.to_string())
        })?,
        None => DEFAULT_WRITE_BEHIND_MS,
    };

    let raw = lookup("CART_WRITE_POLICY").unwrap_or_else(|| "write-through".to_string());
    match raw.trim().to_ascii_lowercase().as_str() {
        "write-through" => Ok(WritePolicy::WriteThrough),
        "write-behind" => Ok(WritePolicy::WriteBehind {
            window: Duration::from_millis(window_ms),
        }),
        other => Err(ConfigError::InvalidEnvVar(
            "CART_WRITE_POLICY".to_string(),
            format!("unknown policy '{other}' (expected write-through or write-behind)"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<CartConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CartConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.storage_key, "@GoMarketplace:cart");
        assert_eq!(config.write_policy, WritePolicy::WriteThrough);
        match config.storage {
            StorageConfig::File { path } => {
                assert_eq!(path, PathBuf::from("gomarketplace-storage.json"));
            }
            other => panic!("expected file backend, got {other:?}"),
        }
    }

    #[test]
    fn test_memory_backend() {
        let config = load(&[("CART_STORAGE_BACKEND", "Memory")]).unwrap();
        assert!(matches!(config.storage, StorageConfig::Memory));
    }

    #[test]
    fn test_unknown_backend() {
        let err = load(&[("CART_STORAGE_BACKEND", "redis")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref var, _) if var == "CART_STORAGE_BACKEND"));
    }

    #[test]
    fn test_postgres_requires_url() {
        let err = load(&[("CART_STORAGE_BACKEND", "postgres")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref var) if var == "CART_DATABASE_URL"));
    }

    #[test]
    fn test_postgres_falls_back_to_database_url() {
        let config = load(&[
            ("CART_STORAGE_BACKEND", "postgres"),
            ("DATABASE_URL", "postgres://localhost/cart"),
        ])
        .unwrap();
        match config.storage {
            StorageConfig::Postgres { database_url } => {
                assert_eq!(database_url.expose_secret(), "postgres://localhost/cart");
            }
            other => panic!("expected postgres backend, got {other:?}"),
        }
    }

    #[test]
    fn test_write_behind_window() {
        let config = load(&[
            ("CART_WRITE_POLICY", "write-behind"),
            ("CART_WRITE_BEHIND_MS", "40"),
        ])
        .unwrap();
        assert_eq!(
            config.write_policy,
            WritePolicy::WriteBehind {
                window: Duration::from_millis(40)
            }
        );
    }

    #[test]
    fn test_invalid_window() {
        let err = load(&[("CART_WRITE_BEHIND_MS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref var, _) if var == "CART_WRITE_BEHIND_MS"));
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(load(&[("CART_STORAGE_KEY", "  ")]).is_err());
    }

    #[test]
    fn test_store_options() {
        let config = load(&[("CART_STORAGE_KEY", "@Test:cart")]).unwrap();
        let options = config.store_options();
        assert_eq!(options.storage_key, "@Test:cart");
        assert_eq!(options.write_policy, WritePolicy::WriteThrough);
    }

    #[test]
    fn test_storage_debug_redacts_database_url() {
        let storage = StorageConfig::Postgres {
            database_url: SecretString::from("postgres://user:hunter2@db/cart"),
        };
        let debug_output = format!("{storage:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2"));
    }
}
