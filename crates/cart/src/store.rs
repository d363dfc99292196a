//! The cart store.
//!
//! [`CartStore`] owns the cart collection. The current [`Cart`] lives in a
//! `tokio::sync::watch` channel: every mutation that changes the cart
//! publishes a new snapshot to subscribers, and the configured
//! [`WritePolicy`] decides when that snapshot reaches storage.
//!
//! # Lifecycle
//!
//! 1. [`CartStore::open`] starts from an empty cart and loads the snapshot
//!    stored under the configured key, if there is one. Loading never writes.
//! 2. [`add`](CartStore::add), [`increment`](CartStore::increment) and
//!    [`decrement`](CartStore::decrement) mutate and persist.
//! 3. [`CartStore::close`] flushes unsaved changes and stops the
//!    write-behind persister.
//!
//! # Failure semantics
//!
//! Storage failures are returned to the caller and never retried. A failed
//! write-through does not roll the in-memory cart back: subscribers have
//! already seen the new state and the next successful write carries it.

use std::sync::Arc;

use gomarketplace_core::{Cart, Product, ProductId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::config::DEFAULT_STORAGE_KEY;
use crate::error::{CartError, Result};
use crate::persister::{SnapshotWriter, WritePolicy, spawn_write_behind};
use crate::storage::KeyValueStore;

/// Options for opening a [`CartStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Key the snapshot is stored under.
    pub storage_key: String,
    /// When snapshots are written.
    pub write_policy: WritePolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            write_policy: WritePolicy::default(),
        }
    }
}

/// Cart collection synchronized to a key-value store.
pub struct CartStore {
    state: watch::Sender<Cart>,
    writer: SnapshotWriter,
    options: StoreOptions,
    persister: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("options", &self.options)
            .field("lines", &self.state.borrow().len())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Open a store: load the persisted snapshot, then start persisting.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the snapshot cannot be read, or
    /// `CartError::Snapshot` if it is not a valid cart.
    pub async fn open(storage: Arc<dyn KeyValueStore>, options: StoreOptions) -> Result<Self> {
        let writer = SnapshotWriter::new(storage, &options.storage_key);
        let (state, _) = watch::channel(Cart::new());

        let mut store = Self {
            state,
            writer,
            options,
            persister: None,
        };

        store.load().await?;

        if let WritePolicy::WriteBehind { window } = store.options.write_policy {
            let changes = store.state.subscribe();
            store.persister = Some(spawn_write_behind(store.writer.clone(), changes, window));
        }

        Ok(store)
    }

    /// Replace the empty cart with the stored snapshot, if any.
    #[instrument(skip(self), fields(key = %self.options.storage_key))]
    async fn load(&self) -> Result<()> {
        let Some(raw) = self.writer.storage().get(self.writer.key()).await? else {
            tracing::info!("No stored cart, starting empty");
            return Ok(());
        };

        let cart: Cart = serde_json::from_str(&raw)?;
        tracing::info!(
            lines = cart.len(),
            items = cart.item_count(),
            "Loaded stored cart"
        );
        self.state.send_replace(cart);
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current cart snapshot.
    #[must_use]
    pub fn products(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Observe the cart. The receiver sees a new value after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.state.borrow().item_count()
    }

    /// Options this store was opened with.
    #[must_use]
    pub const fn options(&self) -> &StoreOptions {
        &self.options
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Put one unit of `product` in the cart and persist.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if a write-through snapshot write fails.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add(&self, product: Product) -> Result<()> {
        self.state.send_modify(|cart| cart.add(product));
        self.writer.mark_changed();
        self.persist().await
    }

    /// Add one unit to an existing line and persist.
    ///
    /// Returns `Ok(false)` without touching storage if `id` is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if a write-through snapshot write fails.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn increment(&self, id: &ProductId) -> Result<bool> {
        let changed = self.state.send_if_modified(|cart| cart.increment(id));
        self.persist_if(changed).await
    }

    /// Remove one unit from an existing line and persist.
    ///
    /// The quantity is not floored and the line is never removed. Returns
    /// `Ok(false)` without touching storage if `id` is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if a write-through snapshot write fails.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn decrement(&self, id: &ProductId) -> Result<bool> {
        let changed = self.state.send_if_modified(|cart| cart.decrement(id));
        self.persist_if(changed).await
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write the current snapshot now, whatever the policy.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the write fails.
    pub async fn flush(&self) -> Result<()> {
        let bytes = self
            .writer
            .write_with(|| serde_json::to_string(&*self.state.borrow()))
            .await?;
        tracing::debug!(bytes, key = self.writer.key(), "Cart snapshot written");
        Ok(())
    }

    async fn persist(&self) -> Result<()> {
        if self.options.write_policy.is_write_through() {
            self.flush().await
        } else {
            // The write-behind persister picks the change up from the channel
            Ok(())
        }
    }

    async fn persist_if(&self, changed: bool) -> Result<bool> {
        if changed {
            self.writer.mark_changed();
            self.persist().await?;
        } else {
            tracing::debug!("Product not in cart, nothing to do");
        }
        Ok(changed)
    }

    /// Whether a change has not reached storage yet.
    ///
    /// True after a failed write-through, or while a write-behind window is
    /// still open.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.writer.is_pending()
    }

    /// Write the current snapshot if a change has not reached storage yet.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the write fails.
    pub async fn flush_pending(&self) -> Result<()> {
        if self.writer.is_pending() {
            self.flush().await
        } else {
            tracing::debug!("Stored cart is current, nothing to flush");
            Ok(())
        }
    }

    /// Flush any unsaved change and stop the write-behind persister.
    ///
    /// A store that was never changed leaves storage untouched.
    ///
    /// A write-behind store dropped without `close` still writes its last
    /// pending change once the window passes, as long as the runtime is alive.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the final write fails, or
    /// `CartError::Persister` if the persister task panicked.
    pub async fn close(self) -> Result<()> {
        self.flush_pending().await?;

        if let Some(handle) = self.persister {
            // Storage already holds the latest snapshot; any write the
            // persister still has in flight carries the same contents.
            handle.abort();
            match handle.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => return Err(CartError::Persister(e.to_string())),
            }
        }
        tracing::debug!("Cart store closed");
        Ok(())
    }
}
