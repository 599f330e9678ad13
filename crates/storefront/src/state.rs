//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::shopify::StorefrontClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the Storefront API client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
}

impl AppState {
    /// Create a new application state, building the Storefront client from
    /// `config.shopify`.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let storefront = StorefrontClient::new(&config.shopify);
        Self {
            inner: Arc::new(AppStateInner { config, storefront }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }
}

#[cfg(test)]
impl AppState {
    /// State whose Shopify endpoint refuses connections.
    pub(crate) fn unreachable_for_tests() -> Self {
        use std::time::Duration;

        use secrecy::SecretString;

        use crate::config::{ShopifyStorefrontConfig, StorefrontToken};

        Self::new(StorefrontConfig {
            host: std::net::IpAddr::from([127, 0, 0, 1]),
            port: 0,
            shopify: ShopifyStorefrontConfig {
                store_domain: "test.myshopify.com".to_string(),
                api_version: "2024-01".to_string(),
                token: StorefrontToken::Public(SecretString::from("test-token")),
                endpoint_override: Some("http://127.0.0.1:1/graphql.json".to_string()),
                cache_ttl: Duration::from_secs(60),
            },
            sentry_dsn: None,
            sentry_environment: None,
        })
    }
}
