//! REST access to the product catalog.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use leekspin_core::{Product, ProductFilter, ProductId};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(get_product))
}

#[derive(Debug, Serialize)]
struct ProductList {
    products: Vec<Product>,
    count: usize,
}

/// List products, optionally filtered.
///
/// GET /api/products?category=...&minPrice=...&maxPrice=...&inStock=...&featured=...&search=...
async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Json<ProductList> {
    let products: Vec<Product> = state
        .catalog()
        .list(&filter)
        .into_iter()
        .cloned()
        .collect();
    let count = products.len();
    Json(ProductList { products, count })
}

/// Fetch a single product by id.
///
/// GET /api/products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, AppError> {
    let id = ProductId::new(id);
    state
        .catalog()
        .by_id(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))
}
