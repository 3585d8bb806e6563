//! The immutable catalog store and its query engine.
//!
//! The catalog is loaded once (from embedded seed data or any JSON source),
//! validated, and never mutated afterwards. All queries are deterministic,
//! side-effect-free functions over the loaded product list, returning matches
//! in catalog (insertion) order unless documented otherwise.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::{Product, ProductId};

/// Embedded demo catalog, the ground truth for the storefront.
const SEED_CATALOG: &str = include_str!("../data/catalog.json");

/// Default result cap for [`Catalog::search`].
const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Default result cap for [`Catalog::recommendations`].
const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// Errors that can occur while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog source was not valid JSON for a product list.
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share the same id.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),

    /// A product has a non-positive id.
    #[error("invalid product id: {0}")]
    InvalidId(ProductId),

    /// A product has a negative price.
    #[error("negative price for product {0}")]
    NegativePrice(ProductId),
}

/// Optional, AND-combined constraints for [`Catalog::list`].
///
/// Absent fields impose no constraint. `search` matches case-insensitively
/// against name, description, category, and tags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductFilter {
    /// Case-insensitive exact category match.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    /// Exact stock-state match.
    pub in_stock: Option<bool>,
    /// Exact featured-flag match.
    pub featured: Option<bool>,
    /// Case-insensitive substring search.
    pub search: Option<String>,
}

impl ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category
            && !product.category.eq_ignore_ascii_case(category)
        {
            return false;
        }
        if let Some(min) = self.min_price
            && product.price < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && product.price > max
        {
            return false;
        }
        if let Some(in_stock) = self.in_stock
            && product.in_stock != in_stock
        {
            return false;
        }
        if let Some(featured) = self.featured
            && product.featured != featured
        {
            return false;
        }
        if let Some(search) = &self.search
            && !matches_search(product, search, true)
        {
            return false;
        }
        true
    }
}

/// Case-insensitive substring match over name, description, tags, and
/// (optionally) the category.
fn matches_search(product: &Product, term: &str, include_category: bool) -> bool {
    let term = term.to_lowercase();
    product.name.to_lowercase().contains(&term)
        || product.description.to_lowercase().contains(&term)
        || (include_category && product.category.to_lowercase().contains(&term))
        || product.tags.iter().any(|tag| tag.contains(&term))
}

/// Input for [`Catalog::recommendations`].
///
/// The three strategies are mutually exclusive, chosen by which field is
/// present in priority order: `product_id`, then `category`, then the
/// featured-products fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecommendationParams {
    /// Base product for similarity (same category or overlapping tags).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    /// Category to recommend from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Inclusive `[low, high]` price window applied to the candidate set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<[Decimal; 2]>,
    /// Maximum number of recommendations to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Stock answer for [`Catalog::availability`].
///
/// Unknown ids are a tagged variant rather than an error: callers render a
/// "not found" answer, they do not fail the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// The product exists; carries its name and stock state.
    Known {
        /// Product display name.
        name: String,
        /// Whether it can currently be purchased.
        in_stock: bool,
    },
    /// No product has the queried id.
    NotFound,
}

impl Availability {
    /// Display name, using the documented sentinel text for unknown ids.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Known { name, .. } => name,
            Self::NotFound => "Product not found",
        }
    }

    /// Stock state; unknown products are never in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        match self {
            Self::Known { in_stock, .. } => *in_stock,
            Self::NotFound => false,
        }
    }
}

/// The immutable, in-memory catalog store.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Load and validate a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON, duplicate ids, non-positive ids,
    /// or negative prices.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;

        let mut seen = std::collections::HashSet::new();
        for product in &products {
            if product.id.as_i64() <= 0 {
                return Err(CatalogError::InvalidId(product.id));
            }
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if product.price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice(product.id));
            }
        }

        Ok(Self { products })
    }

    /// Load the embedded demo catalog.
    ///
    /// # Panics
    ///
    /// Panics if the embedded seed data is invalid; this is a build artifact
    /// problem, not a runtime condition.
    #[must_use]
    pub fn seed() -> Self {
        Self::from_json(SEED_CATALOG).expect("embedded catalog seed is valid")
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products matching every constraint present in `filter`, in catalog
    /// order, with no implicit limit.
    #[must_use]
    pub fn list(&self, filter: &ProductFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Substring search over name, description, and tags (not category),
    /// optionally narrowed to one category, truncated to `limit` after
    /// filtering. First-match-wins ordering; no relevance ranking.
    #[must_use]
    pub fn search(&self, query: &str, limit: Option<usize>, category: Option<&str>) -> Vec<&Product> {
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        self.products
            .iter()
            .filter(|p| matches_search(p, query, false))
            .filter(|p| category.is_none_or(|c| p.category.eq_ignore_ascii_case(c)))
            .take(limit)
            .collect()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// All products in a category (case-insensitive exact match).
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.list(&ProductFilter {
            category: Some(category.to_string()),
            ..ProductFilter::default()
        })
    }

    /// Products with `min <= price <= max`. An inverted range (`min > max`)
    /// matches nothing and is not an error.
    #[must_use]
    pub fn in_price_range(&self, min: Decimal, max: Decimal) -> Vec<&Product> {
        self.list(&ProductFilter {
            min_price: Some(min),
            max_price: Some(max),
            ..ProductFilter::default()
        })
    }

    /// All featured products.
    #[must_use]
    pub fn featured(&self) -> Vec<&Product> {
        self.list(&ProductFilter {
            featured: Some(true),
            ..ProductFilter::default()
        })
    }

    /// Distinct categories present in the catalog, lexicographically sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.products
            .iter()
            .map(|p| p.category.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Stock check that never fails: unknown ids yield
    /// [`Availability::NotFound`].
    #[must_use]
    pub fn availability(&self, id: ProductId) -> Availability {
        self.by_id(id).map_or(Availability::NotFound, |p| {
            Availability::Known {
                name: p.name.clone(),
                in_stock: p.in_stock,
            }
        })
    }

    /// Product recommendations.
    ///
    /// Candidate strategies in priority order: similarity to `product_id`
    /// (same category or at least one shared tag, excluding the product
    /// itself), else same `category`, else all featured products. An optional
    /// inclusive price window then narrows the candidates.
    ///
    /// Candidates are ranked deterministically: tag-overlap count with the
    /// base product (descending), then price proximity to the base product
    /// (ascending), then id. Without a base product the candidate order is
    /// catalog order.
    #[must_use]
    pub fn recommendations(&self, params: &RecommendationParams) -> Vec<&Product> {
        let limit = params.limit.unwrap_or(DEFAULT_RECOMMENDATION_LIMIT);

        let base = params.product_id.and_then(|id| self.by_id(id));

        let mut candidates: Vec<&Product> = if let Some(base) = base {
            self.products
                .iter()
                .filter(|p| p.id != base.id)
                .filter(|p| p.category == base.category || p.tag_overlap(base) > 0)
                .collect()
        } else if params.product_id.is_some() {
            // Unknown base product: nothing is similar to it.
            Vec::new()
        } else if let Some(category) = &params.category {
            self.by_category(category)
        } else {
            self.featured()
        };

        if let Some([low, high]) = params.price_range {
            candidates.retain(|p| p.price >= low && p.price <= high);
        }

        if let Some(base) = base {
            candidates.sort_by(|a, b| {
                b.tag_overlap(base)
                    .cmp(&a.tag_overlap(base))
                    .then_with(|| {
                        let da = (a.price - base.price).abs();
                        let db = (b.price - base.price).abs();
                        da.cmp(&db)
                    })
                    .then_with(|| a.id.cmp(&b.id))
            });
        }

        candidates.truncate(limit);
        candidates
    }
}
