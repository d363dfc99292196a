//! Product identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input string is empty or only whitespace.
    #[error("product id cannot be empty")]
    Empty,
}

/// Opaque identifier of a catalog product.
///
/// The cart never interprets the identifier; it is only compared for
/// equality when looking up a line item. Identifiers coming from the catalog
/// API are trusted as-is via [`ProductId::new`]. Input typed by a person (CLI
/// arguments, fixture files) goes through [`ProductId::parse`].
///
/// ## Examples
///
/// ```
/// use gomarketplace_core::ProductId;
///
/// let id = ProductId::new("p1");
/// assert_eq!(id.as_str(), "p1");
///
/// assert!(ProductId::parse("  ").is_err());
/// assert_eq!(ProductId::parse(" p2 ").unwrap().as_str(), "p2");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap an identifier without validation.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse a `ProductId` from user input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ProductIdError::Empty`] if nothing is left after trimming.
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProductIdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_input_verbatim() {
        // Catalog ids are opaque, including odd whitespace
        let id = ProductId::new(" a b ");
        assert_eq!(id.as_str(), " a b ");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(ProductId::parse(""), Err(ProductIdError::Empty));
        assert_eq!(ProductId::parse("   \t"), Err(ProductIdError::Empty));
    }

    #[test]
    fn test_parse_trims() {
        let id: ProductId = "  sku-42\n".parse().unwrap();
        assert_eq!(id, ProductId::new("sku-42"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&ProductId::new("p1")).unwrap();
        assert_eq!(json, "\"p1\"");

        let id: ProductId = serde_json::from_str("\"p9\"").unwrap();
        assert_eq!(id.into_inner(), "p9");
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductId::from("abc").to_string(), "abc");
    }
}
