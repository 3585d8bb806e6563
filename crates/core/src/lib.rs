//! Leekspin Core - Catalog and cart domain library.
//!
//! This crate provides the data layer shared by the Leekspin Market server:
//! - `server` - HTTP service hosting the conversational shopping agent
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. The catalog is loaded once and is read-only afterwards,
//! so it can be shared freely across concurrent requests without locking.
//!
//! # Modules
//!
//! - [`product`] - Product records and the type-safe [`ProductId`]
//! - [`catalog`] - The immutable catalog store and its query engine
//! - [`cart`] - Request-scoped cart snapshot decoding

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod product;

pub use cart::{CartLine, CartSnapshot};
pub use catalog::{Availability, Catalog, CatalogError, ProductFilter, RecommendationParams};
pub use product::{Product, ProductId};
