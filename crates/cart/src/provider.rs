//! Cart provider and consumer handles.
//!
//! A [`CartProvider`] is the explicitly constructed owner of one mounted
//! [`CartStore`]. Consumers (screens, commands, background jobs) receive a
//! [`CartHandle`] from it instead of reaching for a process-wide cart.
//!
//! Handles hold only a weak reference. Once the provider is unmounted or
//! dropped, every handle operation fails with
//! [`CartError::OutsideProvider`] instead of silently acting on a stale cart.
//!
//! # Example
//!
//! ```rust,ignore
//! use gomarketplace_cart::{CartProvider, StoreOptions};
//! use gomarketplace_cart::storage::MemoryStore;
//!
//! let provider = CartProvider::mount(Arc::new(MemoryStore::new()), StoreOptions::default()).await?;
//! let cart = provider.handle();
//!
//! cart.add(product).await?;
//! cart.increment(&product_id).await?;
//! println!("{} items", cart.products()?.item_count());
//!
//! provider.unmount().await?;
//! assert!(cart.products().is_err());
//! ```

use std::sync::{Arc, Weak};

use gomarketplace_core::{Cart, Product, ProductId};
use tokio::sync::watch;

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::storage::{KeyValueStore, open_storage};
use crate::store::{CartStore, StoreOptions};

/// Owner of a mounted cart store.
#[derive(Debug)]
pub struct CartProvider {
    store: Arc<CartStore>,
}

impl CartProvider {
    /// Open the store over `storage` and take ownership of it.
    ///
    /// # Errors
    ///
    /// Returns any error from [`CartStore::open`].
    pub async fn mount(storage: Arc<dyn KeyValueStore>, options: StoreOptions) -> Result<Self> {
        let store = CartStore::open(storage, options).await?;
        tracing::debug!(policy = %store.options().write_policy, "Cart provider mounted");
        Ok(Self {
            store: Arc::new(store),
        })
    }

    /// Build the configured storage backend and mount a store over it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the backend cannot be opened, or any
    /// error from [`CartStore::open`].
    pub async fn from_config(config: &CartConfig) -> Result<Self> {
        let storage = open_storage(&config.storage).await?;
        Self::mount(storage, config.store_options()).await
    }

    /// Get a handle for a consumer.
    #[must_use]
    pub fn handle(&self) -> CartHandle {
        CartHandle {
            store: Arc::downgrade(&self.store),
        }
    }

    /// Get a reference to the mounted store.
    #[must_use]
    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// Flush unsaved changes and release the store.
    ///
    /// Outstanding handles start failing with `CartError::OutsideProvider`.
    ///
    /// # Errors
    ///
    /// Returns any error from [`CartStore::close`] or
    /// [`CartStore::flush_pending`].
    pub async fn unmount(self) -> Result<()> {
        match Arc::try_unwrap(self.store) {
            Ok(store) => store.close().await,
            Err(shared) => {
                // A handle is mid-operation; the store goes away when it finishes
                tracing::debug!("Cart store still in use during unmount, flushing only");
                shared.flush_pending().await
            }
        }
    }
}

/// Consumer-side reference to a provider's cart.
#[derive(Debug, Clone)]
pub struct CartHandle {
    store: Weak<CartStore>,
}

impl CartHandle {
    fn store(&self) -> Result<Arc<CartStore>> {
        self.store.upgrade().ok_or_else(|| {
            tracing::error!("Cart handle used after its provider was unmounted");
            CartError::OutsideProvider
        })
    }

    /// Whether the provider behind this handle is still mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.store.strong_count() > 0
    }

    /// Current cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` if the provider is gone.
    pub fn products(&self) -> Result<Cart> {
        Ok(self.store()?.products())
    }

    /// Observe the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` if the provider is gone.
    pub fn subscribe(&self) -> Result<watch::Receiver<Cart>> {
        Ok(self.store()?.subscribe())
    }

    /// See [`CartStore::add`].
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` if the provider is gone, or any
    /// error from [`CartStore::add`].
    pub async fn add(&self, product: Product) -> Result<()> {
        self.store()?.add(product).await
    }

    /// See [`CartStore::increment`].
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` if the provider is gone, or any
    /// error from [`CartStore::increment`].
    pub async fn increment(&self, id: &ProductId) -> Result<bool> {
        self.store()?.increment(id).await
    }

    /// See [`CartStore::decrement`].
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` if the provider is gone, or any
    /// error from [`CartStore::decrement`].
    pub async fn decrement(&self, id: &ProductId) -> Result<bool> {
        self.store()?.decrement(id).await
    }
}
