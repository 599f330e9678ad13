//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client`'s query envelope with `reqwest` 0.13 for HTTP.
//! Caches products and collections using `moka` (configurable TTL, tagged).

pub mod cache;
mod conversions;
pub mod queries;
mod wire;

use std::sync::Arc;

use graphql_client::{GraphQLQuery, Response};
use harbor_core::{
    Cart, CartId, CartLineId, CartLineInput, CartLineUpdateInput, Collection, Product,
};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::{ShopifyStorefrontConfig, StorefrontToken};
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

use cache::{CacheKey, CacheValue, StorefrontCache};
use conversions::{
    cart_from_payload, convert_cart, convert_collection, convert_collection_connection,
    convert_product, convert_product_connection,
};
use queries::{
    AddToCart, CreateCart, GetCart, GetCollection, GetCollections, GetProduct, GetProducts,
    RemoveFromCart, UpdateCart, add_to_cart, create_cart, get_cart, get_collection,
    get_collections, get_product, get_products, remove_from_cart, update_cart,
};

/// Largest page the Storefront API accepts.
pub const MAX_PAGE_SIZE: u32 = 250;

/// How much of an unexpected response body ends up in logs and errors.
const BODY_PREVIEW_CHARS: usize = 500;

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides typed access to products, collections, and cart operations.
/// Catalog reads are cached; cart reads and writes never are.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    token: StorefrontToken,
    cache: StorefrontCache,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint(),
                token: config.token.clone(),
                cache: StorefrontCache::new(config.cache_ttl),
            }),
        }
    }

    /// The GraphQL endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);
        let operation = request_body.operation_name;

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Public and private tokens travel in different headers
            .header(
                self.inner.token.header_name(),
                self.inner.token.secret().expose_secret(),
            )
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            tracing::warn!(operation, retry_after, "Shopify rate limited request");
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                operation,
                status = %status,
                body = %preview(&response_text),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::Status {
                status: status.as_u16(),
                body: preview(&response_text),
            });
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    operation,
                    error = %e,
                    body = %preview(&response_text),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(operation, errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(convert_graphql_error).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation,
                body = %preview(&response_text),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::MissingData(operation)
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get the newest products, up to `first` (clamped to 1..=250).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the payload is malformed.
    #[instrument(skip(self))]
    pub async fn get_products(&self, first: u32) -> Result<Vec<Product>, ShopifyError> {
        let first = first.clamp(1, MAX_PAGE_SIZE);
        let cache_key = CacheKey::Products { first };

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let data = self
            .execute::<GetProducts>(get_products::Variables {
                first: i64::from(first),
            })
            .await?;
        let products = convert_product_connection(data.products)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by its handle. Unknown handles yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the payload is malformed.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product(&self, handle: &str) -> Result<Option<Product>, ShopifyError> {
        let cache_key = CacheKey::Product(handle.to_string());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(product.map(|p| *p));
        }

        let data = self
            .execute::<GetProduct>(get_product::Variables {
                handle: handle.to_string(),
            })
            .await?;
        let product = data.product.map(convert_product).transpose()?;

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Product(product.clone().map(Box::new)),
            )
            .await;

        Ok(product)
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// Get up to 100 collections, without their products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the payload is malformed.
    #[instrument(skip(self))]
    pub async fn get_collections(&self) -> Result<Vec<Collection>, ShopifyError> {
        let cache_key = CacheKey::Collections;

        if let Some(CacheValue::Collections(collections)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let data = self
            .execute::<GetCollections>(get_collections::Variables::default())
            .await?;
        let collections = convert_collection_connection(data.collections)?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Collections(collections.clone()))
            .await;

        Ok(collections)
    }

    /// Get a collection and its first 100 products. Unknown handles yield
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the payload is malformed.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection(&self, handle: &str) -> Result<Option<Collection>, ShopifyError> {
        let cache_key = CacheKey::Collection(handle.to_string());

        if let Some(CacheValue::Collection(collection)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collection");
            return Ok(collection.map(|c| *c));
        }

        let data = self
            .execute::<GetCollection>(get_collection::Variables {
                handle: handle.to_string(),
            })
            .await?;
        let collection = data.collection.map(convert_collection).transpose()?;

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Collection(collection.clone().map(Box::new)),
            )
            .await;

        Ok(collection)
    }

    // =========================================================================
    // Cache Control
    // =========================================================================

    /// Evict cached catalog entries carrying `tag`
    /// (`products`, `product-{handle}`, `collections`, `collection-{handle}`).
    pub async fn invalidate_tag(&self, tag: &str) {
        self.inner.cache.invalidate_tag(tag).await;
    }

    /// Evict every cached catalog entry.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all().await;
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Create a new, empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify reports user errors.
    #[instrument(skip(self))]
    pub async fn create_cart(&self) -> Result<Cart, ShopifyError> {
        let data = self
            .execute::<CreateCart>(create_cart::Variables::default())
            .await?;
        cart_from_payload(data.cart_create, "cartCreate")
    }

    /// Get a cart by ID. Unknown or expired carts yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Option<Cart>, ShopifyError> {
        let data = self
            .execute::<GetCart>(get_cart::Variables {
                cart_id: cart_id.clone(),
            })
            .await?;
        Ok(data.cart.map(convert_cart))
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify reports user errors.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id, lines = lines.len()))]
    pub async fn add_to_cart(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let data = self
            .execute::<AddToCart>(add_to_cart::Variables {
                cart_id: cart_id.clone(),
                lines,
            })
            .await?;
        cart_from_payload(data.cart_lines_add, "cartLinesAdd")
    }

    /// Set line quantities. A quantity of zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify reports user errors.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id, lines = lines.len()))]
    pub async fn update_cart(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        let data = self
            .execute::<UpdateCart>(update_cart::Variables {
                cart_id: cart_id.clone(),
                lines,
            })
            .await?;
        cart_from_payload(data.cart_lines_update, "cartLinesUpdate")
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify reports user errors.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id, lines = line_ids.len()))]
    pub async fn remove_from_cart(
        &self,
        cart_id: &CartId,
        line_ids: Vec<CartLineId>,
    ) -> Result<Cart, ShopifyError> {
        let data = self
            .execute::<RemoveFromCart>(remove_from_cart::Variables {
                cart_id: cart_id.clone(),
                line_ids,
            })
            .await?;
        cart_from_payload(data.cart_lines_remove, "cartLinesRemove")
    }
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}
