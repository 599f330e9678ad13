//! Collection catalog handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use harbor_core::Collection;
use serde::Serialize;
use tracing::instrument;

use super::catalog_cache_control;
use crate::error::{AppError, Result, UpstreamContext};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CollectionsResponse {
    pub collections: Vec<Collection>,
}

#[derive(Debug, Serialize)]
pub struct CollectionResponse {
    pub collection: Collection,
}

/// `GET /api/collections`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let collections = state
        .storefront()
        .get_collections()
        .await
        .upstream("Failed to fetch collections")?;

    Ok((
        [(
            header::CACHE_CONTROL,
            catalog_cache_control(state.config().shopify.cache_ttl),
        )],
        Json(CollectionsResponse { collections }),
    ))
}

/// `GET /api/collections/{handle}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse> {
    let collection = state
        .storefront()
        .get_collection(&handle)
        .await
        .upstream("Failed to fetch collection")?
        .ok_or_else(|| AppError::NotFound("Collection not found".to_string()))?;

    Ok((
        [(
            header::CACHE_CONTROL,
            catalog_cache_control(state.config().shopify.cache_ttl),
        )],
        Json(CollectionResponse { collection }),
    ))
}
