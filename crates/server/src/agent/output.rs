//! Structured tool outputs consumed by the rendering layer.
//!
//! Field names here are a wire contract with the chat client; every shape
//! carries a human-readable `message` summary alongside its data.

use leekspin_core::{CartLine, Product, ProductId, RecommendationParams};
use rust_decimal::Decimal;
use serde::Serialize;

use super::checkout::CheckoutFormOutput;
use super::navigation::NavigationOutput;

/// The output of one tool execution, shaped per tool.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    /// Product list tools (`list_products`, `search_products`,
    /// `filter_by_category`, `get_products_in_price_range`,
    /// `get_featured_products`).
    Products(ProductListOutput),
    /// `get_product_details`.
    ProductDetails(ProductDetailsOutput),
    /// `get_product_categories`.
    Categories(CategoriesOutput),
    /// `check_availability`.
    Availability(AvailabilityOutput),
    /// `get_recommendations`.
    Recommendations(RecommendationsOutput),
    /// `list_cart_items`.
    CartItems(CartItemsOutput),
    /// `navigate_to_page`.
    Navigation(NavigationOutput),
    /// `fill_checkout_form`.
    CheckoutForm(CheckoutFormOutput),
}

/// A list of products plus an echo of the query that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ProductListOutput {
    /// Matching products.
    pub products: Vec<Product>,
    /// Number of matches.
    pub count: usize,
    /// Search query echo (`search_products` only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Category echo (`filter_by_category` only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Price range echo (`get_products_in_price_range` only).
    #[serde(rename = "priceRange", skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRangeEcho>,
    /// Human-readable summary.
    pub message: String,
}

/// Echo of the requested price bounds.
#[derive(Debug, Clone, Serialize)]
pub struct PriceRangeEcho {
    /// Inclusive lower bound.
    #[serde(rename = "minPrice")]
    pub min_price: Decimal,
    /// Inclusive upper bound.
    #[serde(rename = "maxPrice")]
    pub max_price: Decimal,
}

/// One product's full record.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetailsOutput {
    /// The product.
    pub product: Product,
    /// Human-readable summary.
    pub message: String,
}

/// The catalog's category list.
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesOutput {
    /// Sorted, distinct categories.
    pub categories: Vec<String>,
    /// Number of categories.
    pub count: usize,
    /// Human-readable summary.
    pub message: String,
}

/// Stock state for one product.
///
/// Unknown ids are reported with `inStock: false` and the documented
/// "Product not found" name, never as an error.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityOutput {
    /// The queried product id.
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    /// The product's name, or the not-found sentinel text.
    #[serde(rename = "productName")]
    pub product_name: String,
    /// Whether the product can be purchased.
    #[serde(rename = "inStock")]
    pub in_stock: bool,
    /// Display label: "In Stock" or "Out of Stock".
    pub availability: String,
    /// Human-readable summary.
    pub message: String,
}

/// Recommended products plus the parameters they were based on.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationsOutput {
    /// Recommended products, ranked.
    pub recommendations: Vec<Product>,
    /// Number of recommendations.
    pub count: usize,
    /// Echo of the recommendation parameters.
    pub based_on: RecommendationParams,
    /// Human-readable summary.
    pub message: String,
}

/// The request's decoded cart snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemsOutput {
    /// Cart lines, in client order.
    pub items: Vec<CartLine>,
    /// Number of distinct lines.
    pub count: usize,
    /// Sum of price times quantity over all lines.
    pub total: Decimal,
    /// Human-readable summary.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_list_omits_absent_echo_fields() {
        let output = ToolOutput::Products(ProductListOutput {
            products: vec![],
            count: 0,
            query: None,
            category: None,
            price_range: None,
            message: "Found 0 products".to_string(),
        });
        let json = serde_json::to_value(&output).expect("serialize");
        assert!(json.get("query").is_none());
        assert!(json.get("priceRange").is_none());
        assert_eq!(json["count"], 0);
    }

    #[test]
    fn test_price_range_echo_field_names() {
        let output = ToolOutput::Products(ProductListOutput {
            products: vec![],
            count: 0,
            query: None,
            category: None,
            price_range: Some(PriceRangeEcho {
                min_price: Decimal::new(10, 0),
                max_price: Decimal::new(50, 0),
            }),
            message: "Found 0 products between $10 and $50".to_string(),
        });
        let json = serde_json::to_value(&output).expect("serialize");
        assert_eq!(json["priceRange"]["minPrice"], "10");
        assert_eq!(json["priceRange"]["maxPrice"], "50");
    }

    #[test]
    fn test_availability_output_field_names() {
        let output = ToolOutput::Availability(AvailabilityOutput {
            product_id: ProductId::new(7),
            product_name: "Classic Spinning Leek".to_string(),
            in_stock: true,
            availability: "In Stock".to_string(),
            message: "Classic Spinning Leek is available".to_string(),
        });
        let json = serde_json::to_value(&output).expect("serialize");
        assert_eq!(json["productId"], 7);
        assert_eq!(json["productName"], "Classic Spinning Leek");
        assert_eq!(json["inStock"], true);
    }
}
