//! Seed the cart from a YAML product list.
//!
//! The file is a list of product descriptors. Each entry is added once, so
//! listing a product twice leaves it at quantity 2:
//!
//! ```yaml
//! - id: "p1"
//!   title: Shirt
//!   image_url: https://cdn.example/p1.png
//!   price: 10
//! - id: "p2"
//!   title: Hat
//!   image_url: https://cdn.example/p2.png
//!   price: 5.5
//! ```

use std::path::Path;

use gomarketplace_cart::{CartError, CartHandle};
use gomarketplace_core::{Product, ProductId, UnitPrice};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The seed file is not a valid product list.
    #[error("Invalid seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// An entry failed validation.
    #[error("Entry {index}: {reason}")]
    InvalidEntry { index: usize, reason: String },

    /// The cart rejected a product.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// One entry of the seed file.
#[derive(Debug, Deserialize)]
struct SeedProduct {
    id: String,
    title: String,
    image_url: String,
    price: UnitPrice,
}

/// Parse and validate a YAML product list.
///
/// All entries are validated before any of them reaches the cart.
fn parse(content: &str) -> Result<Vec<Product>, SeedError> {
    let entries: Vec<SeedProduct> = serde_yaml::from_str(content)?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let id = ProductId::parse(&entry.id).map_err(|e| SeedError::InvalidEntry {
                index,
                reason: e.to_string(),
            })?;
            if entry.title.trim().is_empty() {
                return Err(SeedError::InvalidEntry {
                    index,
                    reason: "title cannot be empty".to_string(),
                });
            }
            Ok(Product {
                id,
                title: entry.title,
                image_url: entry.image_url,
                price: entry.price,
            })
        })
        .collect()
}

/// Add every product listed in `path` to the cart.
///
/// Returns the number of products added.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, an entry is
/// invalid, or the cart fails to persist.
pub async fn from_file(cart: &CartHandle, path: &Path) -> Result<usize, SeedError> {
    info!(path = %path.display(), "Loading seed products from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
    let products = parse(&content)?;

    info!(products = products.len(), "Parsed seed file");

    let count = products.len();
    for product in products {
        cart.add(product).await?;
    }
    Ok(count)
}
