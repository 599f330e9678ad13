//! Product catalog handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::header,
    response::IntoResponse,
};
use harbor_core::Product;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::catalog_cache_control;
use crate::error::{AppError, Result, UpstreamContext};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub first: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: Product,
}

/// `GET /api/products?first=N`
#[instrument(skip(state, query))]
pub async fn index(
    State(state): State<AppState>,
    query: std::result::Result<Query<ProductsQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) =
        query.map_err(|_| AppError::BadRequest("first must be a positive integer".to_string()))?;
    let products = state
        .storefront()
        .get_products(query.first.unwrap_or(DEFAULT_PAGE_SIZE))
        .await
        .upstream("Failed to fetch products")?;

    Ok((
        [(
            header::CACHE_CONTROL,
            catalog_cache_control(state.config().shopify.cache_ttl),
        )],
        Json(ProductsResponse { products }),
    ))
}

/// `GET /api/products/{handle}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse> {
    let product = state
        .storefront()
        .get_product(&handle)
        .await
        .upstream("Failed to fetch product")?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok((
        [(
            header::CACHE_CONTROL,
            catalog_cache_control(state.config().shopify.cache_ttl),
        )],
        Json(ProductResponse { product }),
    ))
}
