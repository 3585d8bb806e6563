//! Tool argument validation and execution.
//!
//! Arguments arrive as raw JSON from the model and are validated against a
//! typed parameter struct before anything runs; on a schema violation the
//! tool is not invoked. Execution itself is synchronous: every tool is an
//! in-memory read over the request's catalog and cart snapshots.

use leekspin_core::{Catalog, CartSnapshot, ProductFilter, ProductId, RecommendationParams};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use super::checkout::{CheckoutFormParams, fill_checkout_form};
use super::navigation::navigate_to_page;
use super::output::{
    AvailabilityOutput, CartItemsOutput, CategoriesOutput, PriceRangeEcho, ProductDetailsOutput,
    ProductListOutput, RecommendationsOutput, ToolOutput,
};
use super::registry::ToolKind;

/// Errors a tool execution can produce.
///
/// Both variants are recovered at the orchestrator boundary and fed back to
/// the model as error-flagged tool results; they never fail the transport.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments did not match the tool's schema; the tool was not invoked.
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments {
        /// The tool whose arguments were rejected.
        tool: &'static str,
        /// What was wrong with them.
        message: String,
    },

    /// No product has the requested id.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),
}

/// Per-request context passed into every tool execution.
///
/// The cart snapshot is request-scoped: it is decoded once from the request
/// and handed to tools explicitly, so concurrent requests can never observe
/// each other's carts.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    /// The shared, immutable catalog.
    pub catalog: &'a Catalog,
    /// This request's decoded cart.
    pub cart: &'a CartSnapshot,
}

/// Validate arguments and execute one tool.
///
/// # Errors
///
/// Returns `ToolError::InvalidArguments` when `input` does not match the
/// tool's schema, and `ToolError::ProductNotFound` from
/// `get_product_details` for an unknown id.
pub fn execute_tool(
    kind: ToolKind,
    input: &serde_json::Value,
    ctx: &ToolContext<'_>,
) -> Result<ToolOutput, ToolError> {
    match kind {
        ToolKind::ListProducts => list_products(input, ctx),
        ToolKind::SearchProducts => search_products(input, ctx),
        ToolKind::GetProductDetails => get_product_details(input, ctx),
        ToolKind::FilterByCategory => filter_by_category(input, ctx),
        ToolKind::GetProductsInPriceRange => get_products_in_price_range(input, ctx),
        ToolKind::GetFeaturedProducts => {
            parse_args::<EmptyParams>(kind, input)?;
            Ok(get_featured_products(ctx))
        }
        ToolKind::CheckAvailability => check_availability(input, ctx),
        ToolKind::GetProductCategories => {
            parse_args::<EmptyParams>(kind, input)?;
            Ok(get_product_categories(ctx))
        }
        ToolKind::GetRecommendations => get_recommendations(input, ctx),
        ToolKind::ListCartItems => {
            parse_args::<EmptyParams>(kind, input)?;
            Ok(list_cart_items(ctx))
        }
        ToolKind::NavigateToPage => {
            let params: PageParams = parse_args(kind, input)?;
            Ok(ToolOutput::Navigation(navigate_to_page(&params.page)))
        }
        ToolKind::FillCheckoutForm => {
            let params: CheckoutFormParams = parse_args(kind, input)?;
            Ok(ToolOutput::CheckoutForm(fill_checkout_form(params)))
        }
    }
}

/// Deserialize tool arguments, treating `null` as an empty object so
/// no-argument tool calls validate cleanly.
fn parse_args<T: for<'de> Deserialize<'de>>(
    kind: ToolKind,
    input: &serde_json::Value,
) -> Result<T, ToolError> {
    let input = if input.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        input.clone()
    };
    serde_json::from_value(input).map_err(|e| ToolError::InvalidArguments {
        tool: kind.name(),
        message: e.to_string(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EmptyParams {}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchParams {
    query: String,
    limit: Option<usize>,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ProductIdParams {
    product_id: ProductId,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CategoryParams {
    category: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PriceRangeParams {
    min_price: Decimal,
    max_price: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RecommendationArgs {
    product_id: Option<ProductId>,
    category: Option<String>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PageParams {
    page: String,
}

// =============================================================================
// Catalog Query Tools
// =============================================================================

fn list_products(
    input: &serde_json::Value,
    ctx: &ToolContext<'_>,
) -> Result<ToolOutput, ToolError> {
    let filter: ProductFilter = parse_args(ToolKind::ListProducts, input)?;
    let products: Vec<_> = ctx.catalog.list(&filter).into_iter().cloned().collect();
    let count = products.len();
    Ok(ToolOutput::Products(ProductListOutput {
        products,
        count,
        query: None,
        category: None,
        price_range: None,
        message: format!("Found {count} products"),
    }))
}

fn search_products(
    input: &serde_json::Value,
    ctx: &ToolContext<'_>,
) -> Result<ToolOutput, ToolError> {
    let params: SearchParams = parse_args(ToolKind::SearchProducts, input)?;
    let products: Vec<_> = ctx
        .catalog
        .search(&params.query, params.limit, params.category.as_deref())
        .into_iter()
        .cloned()
        .collect();
    let count = products.len();
    Ok(ToolOutput::Products(ProductListOutput {
        products,
        count,
        message: format!("Found {count} products matching \"{}\"", params.query),
        query: Some(params.query),
        category: None,
        price_range: None,
    }))
}

fn get_product_details(
    input: &serde_json::Value,
    ctx: &ToolContext<'_>,
) -> Result<ToolOutput, ToolError> {
    let params: ProductIdParams = parse_args(ToolKind::GetProductDetails, input)?;
    let product = ctx
        .catalog
        .by_id(params.product_id)
        .ok_or(ToolError::ProductNotFound(params.product_id))?
        .clone();
    let message = format!("Product details for {}", product.name);
    Ok(ToolOutput::ProductDetails(ProductDetailsOutput {
        product,
        message,
    }))
}

fn filter_by_category(
    input: &serde_json::Value,
    ctx: &ToolContext<'_>,
) -> Result<ToolOutput, ToolError> {
    let params: CategoryParams = parse_args(ToolKind::FilterByCategory, input)?;
    let products: Vec<_> = ctx
        .catalog
        .by_category(&params.category)
        .into_iter()
        .cloned()
        .collect();
    let count = products.len();
    Ok(ToolOutput::Products(ProductListOutput {
        products,
        count,
        message: format!("Found {count} products in {} category", params.category),
        query: None,
        category: Some(params.category),
        price_range: None,
    }))
}

fn get_products_in_price_range(
    input: &serde_json::Value,
    ctx: &ToolContext<'_>,
) -> Result<ToolOutput, ToolError> {
    let params: PriceRangeParams = parse_args(ToolKind::GetProductsInPriceRange, input)?;
    let products: Vec<_> = ctx
        .catalog
        .in_price_range(params.min_price, params.max_price)
        .into_iter()
        .cloned()
        .collect();
    let count = products.len();
    Ok(ToolOutput::Products(ProductListOutput {
        products,
        count,
        query: None,
        category: None,
        message: format!(
            "Found {count} products between ${} and ${}",
            params.min_price, params.max_price
        ),
        price_range: Some(PriceRangeEcho {
            min_price: params.min_price,
            max_price: params.max_price,
        }),
    }))
}

fn get_featured_products(ctx: &ToolContext<'_>) -> ToolOutput {
    let products: Vec<_> = ctx.catalog.featured().into_iter().cloned().collect();
    let count = products.len();
    ToolOutput::Products(ProductListOutput {
        products,
        count,
        query: None,
        category: None,
        price_range: None,
        message: format!("Found {count} featured products"),
    })
}

fn check_availability(
    input: &serde_json::Value,
    ctx: &ToolContext<'_>,
) -> Result<ToolOutput, ToolError> {
    let params: ProductIdParams = parse_args(ToolKind::CheckAvailability, input)?;
    let availability = ctx.catalog.availability(params.product_id);
    let name = availability.name().to_string();
    let in_stock = availability.in_stock();
    Ok(ToolOutput::Availability(AvailabilityOutput {
        product_id: params.product_id,
        message: format!(
            "{name} is {}",
            if in_stock {
                "available"
            } else {
                "currently out of stock"
            }
        ),
        availability: if in_stock { "In Stock" } else { "Out of Stock" }.to_string(),
        product_name: name,
        in_stock,
    }))
}

fn get_product_categories(ctx: &ToolContext<'_>) -> ToolOutput {
    let categories = ctx.catalog.categories();
    ToolOutput::Categories(CategoriesOutput {
        count: categories.len(),
        message: format!("Available categories: {}", categories.join(", ")),
        categories,
    })
}

fn get_recommendations(
    input: &serde_json::Value,
    ctx: &ToolContext<'_>,
) -> Result<ToolOutput, ToolError> {
    let args: RecommendationArgs = parse_args(ToolKind::GetRecommendations, input)?;
    let params = RecommendationParams {
        product_id: args.product_id,
        category: args.category,
        price_range: match (args.min_price, args.max_price) {
            (Some(low), Some(high)) => Some([low, high]),
            _ => None,
        },
        limit: args.limit,
    };
    let recommendations: Vec<_> = ctx
        .catalog
        .recommendations(&params)
        .into_iter()
        .cloned()
        .collect();
    let count = recommendations.len();
    Ok(ToolOutput::Recommendations(RecommendationsOutput {
        recommendations,
        count,
        based_on: params,
        message: format!("Generated {count} product recommendations"),
    }))
}

// =============================================================================
// Cart Tool
// =============================================================================

fn list_cart_items(ctx: &ToolContext<'_>) -> ToolOutput {
    ToolOutput::CartItems(CartItemsOutput {
        items: ctx.cart.lines().to_vec(),
        count: ctx.cart.count(),
        total: ctx.cart.total(),
        message: ctx.cart.message(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use leekspin_core::CartLine;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::seed()
    }

    fn empty_cart() -> CartSnapshot {
        CartSnapshot::decode(None)
    }

    #[test]
    fn test_list_products_unfiltered() {
        let catalog = catalog();
        let cart = empty_cart();
        let ctx = ToolContext {
            catalog: &catalog,
            cart: &cart,
        };
        let output = execute_tool(ToolKind::ListProducts, &json!({}), &ctx).expect("execute");
        let ToolOutput::Products(out) = output else {
            panic!("expected product list");
        };
        assert_eq!(out.count, catalog.len());
        assert!(out.message.contains(&out.count.to_string()));
    }

    #[test]
    fn test_list_products_rejects_unknown_fields() {
        let catalog = catalog();
        let cart = empty_cart();
        let ctx = ToolContext {
            catalog: &catalog,
            cart: &cart,
        };
        let result = execute_tool(ToolKind::ListProducts, &json!({"colour": "green"}), &ctx);
        assert!(matches!(
            result,
            Err(ToolError::InvalidArguments { tool: "list_products", .. })
        ));
    }

    #[test]
    fn test_search_products_echoes_query() {
        let catalog = catalog();
        let cart = empty_cart();
        let ctx = ToolContext {
            catalog: &catalog,
            cart: &cart,
        };
        let output = execute_tool(
            ToolKind::SearchProducts,
            &json!({"query": "leek", "limit": 3}),
            &ctx,
        )
        .expect("execute");
        let ToolOutput::Products(out) = output else {
            panic!("expected product list");
        };
        assert!(out.count <= 3);
        assert_eq!(out.query.as_deref(), Some("leek"));
        assert!(out.message.contains("\"leek\""));
    }

    #[test]
    fn test_search_products_requires_query() {
        let catalog = catalog();
        let cart = empty_cart();
        let ctx = ToolContext {
            catalog: &catalog,
            cart: &cart,
        };
        let result = execute_tool(ToolKind::SearchProducts, &json!({}), &ctx);
        assert!(matches!(result, Err(ToolError::InvalidArguments { .. })));
    }

    #[test]
    fn test_get_product_details_unknown_id_is_not_found() {
        let catalog = catalog();
        let cart = empty_cart();
        let ctx = ToolContext {
            catalog: &catalog,
            cart: &cart,
        };
        let result = execute_tool(ToolKind::GetProductDetails, &json!({"productId": 9999}), &ctx);
        assert!(matches!(result, Err(ToolError::ProductNotFound(_))));
    }

    #[test]
    fn test_check_availability_unknown_id_is_sentinel() {
        let catalog = catalog();
        let cart = empty_cart();
        let ctx = ToolContext {
            catalog: &catalog,
            cart: &cart,
        };
        let output = execute_tool(ToolKind::CheckAvailability, &json!({"productId": 9999}), &ctx)
            .expect("availability never fails on unknown ids");
        let ToolOutput::Availability(out) = output else {
            panic!("expected availability");
        };
        assert!(!out.in_stock);
        assert_eq!(out.product_name, "Product not found");
        assert_eq!(out.availability, "Out of Stock");
    }

    #[test]
    fn test_price_range_accepts_numeric_bounds() {
        let catalog = catalog();
        let cart = empty_cart();
        let ctx = ToolContext {
            catalog: &catalog,
            cart: &cart,
        };
        let output = execute_tool(
            ToolKind::GetProductsInPriceRange,
            &json!({"minPrice": 10, "maxPrice": 30.5}),
            &ctx,
        )
        .expect("execute");
        let ToolOutput::Products(out) = output else {
            panic!("expected product list");
        };
        assert!(out.price_range.is_some());
        assert!(out
            .products
            .iter()
            .all(|p| p.price >= dec!(10) && p.price <= dec!(30.5)));
    }

    #[test]
    fn test_recommendations_build_price_range_only_when_both_bounds_given() {
        let catalog = catalog();
        let cart = empty_cart();
        let ctx = ToolContext {
            catalog: &catalog,
            cart: &cart,
        };
        let output = execute_tool(ToolKind::GetRecommendations, &json!({"minPrice": 10}), &ctx)
            .expect("execute");
        let ToolOutput::Recommendations(out) = output else {
            panic!("expected recommendations");
        };
        assert!(out.based_on.price_range.is_none());
    }

    #[test]
    fn test_no_argument_tools_accept_null_input() {
        let catalog = catalog();
        let cart = empty_cart();
        let ctx = ToolContext {
            catalog: &catalog,
            cart: &cart,
        };
        let output = execute_tool(ToolKind::GetFeaturedProducts, &serde_json::Value::Null, &ctx)
            .expect("execute");
        let ToolOutput::Products(out) = output else {
            panic!("expected product list");
        };
        assert!(out.products.iter().all(|p| p.featured));
    }

    #[test]
    fn test_categories_sorted() {
        let catalog = catalog();
        let cart = empty_cart();
        let ctx = ToolContext {
            catalog: &catalog,
            cart: &cart,
        };
        let output =
            execute_tool(ToolKind::GetProductCategories, &json!({}), &ctx).expect("execute");
        let ToolOutput::Categories(out) = output else {
            panic!("expected categories");
        };
        let mut sorted = out.categories.clone();
        sorted.sort();
        assert_eq!(out.categories, sorted);
        assert_eq!(out.count, out.categories.len());
    }

    #[test]
    fn test_list_cart_items_uses_request_snapshot() {
        let catalog = catalog();
        let lines = vec![CartLine {
            id: leekspin_core::ProductId::new(1),
            name: "Classic Spinning Leek".to_string(),
            price: dec!(10),
            image: "/i/1.png".to_string(),
            quantity: 2,
        }];
        let token = CartSnapshot::encode_lines(&lines);
        let cart = CartSnapshot::decode(Some(&token));
        let ctx = ToolContext {
            catalog: &catalog,
            cart: &cart,
        };
        let output = execute_tool(ToolKind::ListCartItems, &json!({}), &ctx).expect("execute");
        let ToolOutput::CartItems(out) = output else {
            panic!("expected cart items");
        };
        assert_eq!(out.count, 1);
        assert_eq!(out.total, dec!(20));
    }

    #[test]
    fn test_navigate_checkout_blocked_through_executor() {
        let catalog = catalog();
        let cart = empty_cart();
        let ctx = ToolContext {
            catalog: &catalog,
            cart: &cart,
        };
        let output = execute_tool(ToolKind::NavigateToPage, &json!({"page": "checkout"}), &ctx)
            .expect("execute");
        let ToolOutput::Navigation(out) = output else {
            panic!("expected navigation");
        };
        assert!(!out.success);
        assert_eq!(out.is_checkout, Some(true));
        assert_eq!(out.route.as_deref(), Some("/cart"));
    }

    #[test]
    fn test_fill_checkout_form_missing_field_rejected() {
        let catalog = catalog();
        let cart = empty_cart();
        let ctx = ToolContext {
            catalog: &catalog,
            cart: &cart,
        };
        let result = execute_tool(
            ToolKind::FillCheckoutForm,
            &json!({"firstName": "Loituma"}),
            &ctx,
        );
        assert!(matches!(result, Err(ToolError::InvalidArguments { .. })));
    }
}
