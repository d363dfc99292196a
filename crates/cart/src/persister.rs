//! When and how cart snapshots reach storage.
//!
//! Every write serializes the whole [`Cart`] and overwrites the single
//! snapshot key. Writes are serialized through a gate, and the snapshot is
//! taken only once the gate is held, so a slow write can never land after a
//! newer one and roll the stored cart back.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use gomarketplace_core::Cart;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::storage::KeyValueStore;

/// Persistence policy for cart snapshots.
///
/// Both policies write the full collection, never a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Every mutation awaits a snapshot write before returning.
    #[default]
    WriteThrough,
    /// Mutations return immediately. A background task waits `window` after
    /// a change, then writes whatever snapshot is current, folding any
    /// changes made in the meantime into that one write.
    WriteBehind {
        /// How long the persister waits after a change before writing.
        window: Duration,
    },
}

impl WritePolicy {
    /// Whether mutations write their snapshot before returning.
    #[must_use]
    pub const fn is_write_through(&self) -> bool {
        matches!(self, Self::WriteThrough)
    }
}

impl std::fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WriteThrough => write!(f, "write-through"),
            Self::WriteBehind { window } => {
                write!(f, "write-behind ({}ms)", window.as_millis())
            }
        }
    }
}

/// Writes full snapshots under one key.
///
/// Tracks a revision per cart change and the last revision that reached
/// storage, so callers can skip writes when storage is already current.
#[derive(Clone)]
pub(crate) struct SnapshotWriter {
    storage: Arc<dyn KeyValueStore>,
    key: Arc<str>,
    gate: Arc<Mutex<()>>,
    revision: Arc<AtomicU64>,
    persisted: Arc<AtomicU64>,
}

impl SnapshotWriter {
    pub(crate) fn new(storage: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            storage,
            key: Arc::from(key),
            gate: Arc::new(Mutex::new(())),
            revision: Arc::new(AtomicU64::new(0)),
            persisted: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record a cart change. Call after the change is published.
    pub(crate) fn mark_changed(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether a change has not reached storage yet.
    pub(crate) fn is_pending(&self) -> bool {
        self.persisted.load(Ordering::SeqCst) < self.revision.load(Ordering::SeqCst)
    }

    pub(crate) fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    /// Encode a snapshot while holding the gate and store it.
    ///
    /// Returns the snapshot length in bytes.
    pub(crate) async fn write_with<F>(&self, encode: F) -> Result<usize>
    where
        F: FnOnce() -> serde_json::Result<String> + Send,
    {
        let _guard = self.gate.lock().await;
        // Every change counted here is already in the cart being encoded
        let revision = self.revision.load(Ordering::SeqCst);
        let snapshot = encode()?;
        let bytes = snapshot.len();
        self.storage.set(&self.key, snapshot).await?;
        self.persisted.fetch_max(revision, Ordering::SeqCst);
        Ok(bytes)
    }
}

/// Spawn the write-behind persister.
///
/// The task exits once the sender of `changes` is gone, after writing any
/// change it had not yet seen.
pub(crate) fn spawn_write_behind(
    writer: SnapshotWriter,
    mut changes: watch::Receiver<Cart>,
    window: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            if !window.is_zero() {
                tokio::time::sleep(window).await;
            }

            let result = writer
                .write_with(|| serde_json::to_string(&*changes.borrow_and_update()))
                .await;
            match result {
                Ok(bytes) => tracing::debug!(bytes, key = writer.key(), "Cart snapshot written"),
                Err(e) => tracing::error!(error = %e, key = writer.key(), "Write-behind snapshot failed"),
            }
        }
        tracing::debug!("Write-behind persister stopped");
    })
}
