//! HTTP route handlers.

pub mod chat;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new().merge(chat::router()).merge(products::router())
}
