//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check
//!
//! # Cart proxy (browser-facing, JSON)
//! GET  /api/cart?cartId=...         - Fetch a cart ({"cart": null} if unknown)
//! POST /api/cart                    - Create an empty cart
//! POST /api/cart/add                - Add a variant ({cartId, variantId, quantity?})
//! POST /api/cart/update             - Set a line quantity ({cartId, lineId, quantity})
//! POST /api/cart/remove             - Remove a line ({cartId, lineId})
//!
//! # Catalog (JSON)
//! GET  /api/products?first=N        - Newest products
//! GET  /api/products/{handle}       - Product detail
//! GET  /api/collections             - Collection listing
//! GET  /api/collections/{handle}    - Collection with its products
//! ```

pub mod api;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart proxy router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/api/cart", get(api::cart::show).post(api::cart::create))
        .route("/api/cart/add", post(api::cart::add))
        .route("/api/cart/update", post(api::cart::update))
        .route("/api/cart/remove", post(api::cart::remove))
}

/// Create the catalog router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(api::products::index))
        .route("/api/products/{handle}", get(api::products::show))
        .route("/api/collections", get(api::collections::index))
        .route("/api/collections/{handle}", get(api::collections::show))
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "ok"
}
