//! CLI command implementations.

pub mod cart;
#[cfg(feature = "postgres")]
pub mod migrate;
pub mod seed;
