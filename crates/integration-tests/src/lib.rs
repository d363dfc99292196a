//! Integration tests for the GoMarketplace cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gomarketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - add/increment/decrement behavior through a provider
//! - `file_persistence` - snapshots surviving a remount on the file backend
//! - `snapshot_format` - compatibility of the stored JSON layout

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gomarketplace_cart::storage::FileStore;
use gomarketplace_cart::{CartProvider, StoreOptions, WritePolicy};
use gomarketplace_core::{Product, ProductId, UnitPrice};
use tempfile::TempDir;

/// Build a product with a price given in cents.
#[must_use]
pub fn product(id: &str, title: &str, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        image_url: format!("https://cdn.example/{id}.png"),
        price: UnitPrice::from_cents(cents),
    }
}

/// A scratch directory holding one cart storage file.
pub struct FileFixture {
    dir: TempDir,
}

impl FileFixture {
    /// Create an empty scratch directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path of the storage file inside the fixture.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("storage.json")
    }

    /// Mount a fresh provider over the fixture file.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the stored snapshot cannot be loaded.
    pub async fn mount(
        &self,
        write_policy: WritePolicy,
    ) -> gomarketplace_cart::error::Result<CartProvider> {
        mount_file(&self.path(), write_policy).await
    }
}

impl Default for FileFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Mount a provider backed by the JSON file at `path`.
///
/// # Errors
///
/// Returns the provider's error if the stored snapshot cannot be loaded.
pub async fn mount_file(
    path: &Path,
    write_policy: WritePolicy,
) -> gomarketplace_cart::error::Result<CartProvider> {
    CartProvider::mount(
        Arc::new(FileStore::new(path)),
        StoreOptions {
            write_policy,
            ..StoreOptions::default()
        },
    )
    .await
}
