//! GoMarketplace Cart - persisted shopping-cart store.
//!
//! The cart is an ordered, id-unique list of line items held in memory and
//! mirrored to a key-value store after every change, so it survives
//! restarts of the storefront app.
//!
//! # Architecture
//!
//! - [`store::CartStore`] owns the collection and publishes each new snapshot
//!   through a `tokio::sync::watch` channel
//! - [`persister::WritePolicy`] decides when snapshots are written
//!   (write-through or write-behind)
//! - [`storage`] provides the key-value backends (memory, file, `PostgreSQL`)
//! - [`provider::CartProvider`] mounts a store and hands out
//!   [`provider::CartHandle`]s to consumers
//!
//! Cart mutations themselves live in [`gomarketplace_core::Cart`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod persister;
pub mod provider;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, DEFAULT_STORAGE_KEY, StorageConfig};
pub use error::CartError;
pub use persister::WritePolicy;
pub use provider::{CartHandle, CartProvider};
pub use store::{CartStore, StoreOptions};
