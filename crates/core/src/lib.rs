//! GoMarketplace Core - Shared cart types.
//!
//! This crate provides the types used across all GoMarketplace components:
//! - `cart` - The persisted cart store and its provider
//! - `cli` - Command-line driver for inspecting and mutating a cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure collection logic - no I/O, no
//! storage access, no async runtime. Every mutation the store performs is
//! implemented here on [`Cart`] so it can be tested without a backend.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, line items and the cart collection

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
