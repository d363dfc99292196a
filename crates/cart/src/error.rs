//! Error types for the cart store.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by cart operations.
///
/// A lookup miss on increment/decrement is not an error; those operations
/// return `Ok(false)` instead.
#[derive(Debug, Error)]
pub enum CartError {
    /// A handle was used after its provider was unmounted or dropped.
    #[error("cart handle used outside of its CartProvider")]
    OutsideProvider,

    /// The backing store failed to read or write.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The stored snapshot could not be decoded, or the cart could not be
    /// encoded.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The write-behind persister did not shut down cleanly.
    #[error("Persister error: {0}")]
    Persister(String),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
