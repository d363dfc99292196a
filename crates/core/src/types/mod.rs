//! Core types for GoMarketplace.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::Cart;
pub use id::{ProductId, ProductIdError};
pub use price::UnitPrice;
pub use product::{LineItem, Product};
