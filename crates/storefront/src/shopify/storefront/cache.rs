//! Tagged cache for catalog reads.
//!
//! Every entry carries the tags derived from its key, so a single product or
//! collection can be evicted without flushing everything else. Carts are
//! never cached.

use std::sync::Arc;
use std::time::Duration;

use harbor_core::{Collection, Product};
use moka::future::Cache;
use tracing::{debug, warn};

/// Tag covering every product listing.
pub const PRODUCTS_TAG: &str = "products";
/// Tag covering every collection listing.
pub const COLLECTIONS_TAG: &str = "collections";

const MAX_CAPACITY: u64 = 1000;

/// Cache key for products and collections.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products { first: u32 },
    Product(String),
    Collections,
    Collection(String),
}

impl CacheKey {
    /// Tags an entry under this key is evicted by.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        match self {
            Self::Products { .. } => vec![PRODUCTS_TAG.to_string()],
            Self::Product(handle) => vec![PRODUCTS_TAG.to_string(), product_tag(handle)],
            Self::Collections => vec![COLLECTIONS_TAG.to_string()],
            Self::Collection(handle) => {
                vec![COLLECTIONS_TAG.to_string(), collection_tag(handle)]
            }
        }
    }
}

/// Tag for a single product.
#[must_use]
pub fn product_tag(handle: &str) -> String {
    format!("product-{handle}")
}

/// Tag for a single collection.
#[must_use]
pub fn collection_tag(handle: &str) -> String {
    format!("collection-{handle}")
}

/// Cached value types.
///
/// Misses are cached too (`None`) so repeated lookups of an unknown handle
/// don't hit Shopify.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Product(Option<Box<Product>>),
    Collections(Vec<Collection>),
    Collection(Option<Box<Collection>>),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CacheValue,
    tags: Arc<[String]>,
}

/// TTL cache of catalog responses with tag-based invalidation.
#[derive(Clone)]
pub struct StorefrontCache {
    inner: Cache<CacheKey, CacheEntry>,
}

impl StorefrontCache {
    /// Create a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(MAX_CAPACITY)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();
        Self { inner }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        let hit = self.inner.get(key).await.map(|entry| entry.value);
        debug!(?key, hit = hit.is_some(), "Catalog cache lookup");
        hit
    }

    pub async fn insert(&self, key: CacheKey, value: CacheValue) {
        let tags = key.tags().into();
        self.inner.insert(key, CacheEntry { value, tags }).await;
    }

    /// Evict every entry carrying `tag`.
    pub async fn invalidate_tag(&self, tag: &str) {
        let target = tag.to_string();
        match self
            .inner
            .invalidate_entries_if(move |_, entry| entry.tags.iter().any(|t| *t == target))
        {
            Ok(_) => {
                // Invalidation closures run lazily; flush so the next read misses.
                self.inner.run_pending_tasks().await;
                debug!(tag, "Invalidated catalog cache tag");
            }
            Err(e) => {
                warn!(tag, error = %e, "Tag invalidation unavailable, clearing catalog cache");
                self.invalidate_all().await;
            }
        }
    }

    /// Evict everything.
    pub async fn invalidate_all(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> StorefrontCache {
        StorefrontCache::new(Duration::from_secs(60))
    }

    async fn fill(cache: &StorefrontCache) {
        cache
            .insert(CacheKey::Products { first: 20 }, CacheValue::Products(vec![]))
            .await;
        cache
            .insert(CacheKey::Product("tee".into()), CacheValue::Product(None))
            .await;
        cache
            .insert(CacheKey::Product("hat".into()), CacheValue::Product(None))
            .await;
        cache
            .insert(CacheKey::Collections, CacheValue::Collections(vec![]))
            .await;
        cache
            .insert(CacheKey::Collection("summer".into()), CacheValue::Collection(None))
            .await;
    }

    #[test]
    fn test_key_tags() {
        assert_eq!(CacheKey::Products { first: 5 }.tags(), ["products"]);
        assert_eq!(
            CacheKey::Product("tee".into()).tags(),
            ["products", "product-tee"]
        );
        assert_eq!(CacheKey::Collections.tags(), ["collections"]);
        assert_eq!(
            CacheKey::Collection("summer".into()).tags(),
            ["collections", "collection-summer"]
        );
    }

    #[tokio::test]
    async fn test_negative_entries_are_hits() {
        let cache = cache();
        cache
            .insert(CacheKey::Product("missing".into()), CacheValue::Product(None))
            .await;
        assert!(matches!(
            cache.get(&CacheKey::Product("missing".into())).await,
            Some(CacheValue::Product(None))
        ));
    }

    #[tokio::test]
    async fn test_invalidate_single_product_tag() {
        let cache = cache();
        fill(&cache).await;

        cache.invalidate_tag(&product_tag("tee")).await;

        assert!(cache.get(&CacheKey::Product("tee".into())).await.is_none());
        assert!(cache.get(&CacheKey::Product("hat".into())).await.is_some());
        assert!(cache.get(&CacheKey::Products { first: 20 }).await.is_some());
        assert!(cache.get(&CacheKey::Collections).await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_products_tag() {
        let cache = cache();
        fill(&cache).await;

        cache.invalidate_tag(PRODUCTS_TAG).await;

        assert!(cache.get(&CacheKey::Products { first: 20 }).await.is_none());
        assert!(cache.get(&CacheKey::Product("tee".into())).await.is_none());
        assert!(cache.get(&CacheKey::Product("hat".into())).await.is_none());
        assert!(cache.get(&CacheKey::Collections).await.is_some());
        assert!(
            cache
                .get(&CacheKey::Collection("summer".into()))
                .await
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = cache();
        fill(&cache).await;

        cache.invalidate_all().await;

        assert!(cache.get(&CacheKey::Products { first: 20 }).await.is_none());
        assert!(cache.get(&CacheKey::Product("hat".into())).await.is_none());
        assert!(cache.get(&CacheKey::Collections).await.is_none());
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = StorefrontCache::new(Duration::from_millis(50));
        cache
            .insert(CacheKey::Collections, CacheValue::Collections(vec![]))
            .await;
        assert!(cache.get(&CacheKey::Collections).await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get(&CacheKey::Collections).await.is_none());
    }
}
