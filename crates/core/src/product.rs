//! Product records and type-safe product identifiers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Type-safe product identifier.
///
/// Newtype wrapper around `i64` that prevents mixing product ids with other
/// numeric values. Serializes transparently as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Create a new product id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// A product in the catalog.
///
/// Products are immutable after catalog load. The serialized field names
/// match the shapes the rendering layer consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identity key, stable across the catalog's lifetime.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price in store currency. Decimal, never floating point.
    pub price: Decimal,
    /// Reference to a display asset (opaque to this crate).
    pub image: String,
    /// Longer description used for search matching.
    pub description: String,
    /// Category name. Matched case-insensitively in queries.
    pub category: String,
    /// Whether the product can currently be purchased.
    #[serde(default = "default_true")]
    pub in_stock: bool,
    /// Whether the product is highlighted on the storefront.
    #[serde(default)]
    pub featured: bool,
    /// Lowercase keyword tags used for search and recommendation similarity.
    #[serde(default)]
    pub tags: Vec<String>,
}

const fn default_true() -> bool {
    true
}

impl Product {
    /// Number of tags this product shares with `other`.
    #[must_use]
    pub fn tag_overlap(&self, other: &Self) -> usize {
        self.tags
            .iter()
            .filter(|tag| other.tags.iter().any(|t| t == *tag))
            .count()
    }
}
