//! Product descriptors and cart line items.

use serde::{Deserialize, Serialize};

use super::{ProductId, UnitPrice};

/// A catalog product as handed to the cart, without a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Display image reference.
    pub image_url: String,
    /// Price of one unit.
    pub price: UnitPrice,
}

/// One product placed in the cart.
///
/// `quantity` is signed: decrementing is never floored, so a line can sit at
/// zero or below until the caller does something about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: UnitPrice,
    pub quantity: i64,
}

impl LineItem {
    /// Build the line for a product entering the cart for the first time.
    #[must_use]
    pub fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: 1,
        }
    }

    /// The product descriptor this line was built from.
    #[must_use]
    pub fn product(&self) -> Product {
        Product {
            id: self.id.clone(),
            title: self.title.clone(),
            image_url: self.image_url.clone(),
            price: self.price,
        }
    }
}

impl From<Product> for LineItem {
    fn from(product: Product) -> Self {
        Self::from_product(product)
    }
}
