//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE_DOMAIN` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_STOREFRONT_ACCESS_TOKEN` - Storefront API public access token,
//!   unless a private token is set
//!
//! ## Optional
//! - `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` - Storefront API private access token
//!   (server-side only, takes precedence over the public token)
//! - `SHOPIFY_API_VERSION` - API version (default: 2024-01)
//! - `SHOPIFY_STOREFRONT_ENDPOINT` - Full GraphQL endpoint URL, overriding the
//!   one derived from the store domain
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300, max: one year)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_API_VERSION: &str = "2024-01";
const DEFAULT_CACHE_TTL_SECS: &str = "300";
const MAX_CACHE_TTL_SECS: u64 = 60 * 60 * 24 * 365;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Storefront API access token.
///
/// Shopify expects public and private tokens in different request headers.
#[derive(Clone)]
pub enum StorefrontToken {
    /// Public token, the kind that may also be shipped to browsers.
    Public(SecretString),
    /// Private token, server-side only.
    Private(SecretString),
}

impl StorefrontToken {
    /// Request header carrying this token.
    #[must_use]
    pub const fn header_name(&self) -> &'static str {
        match self {
            Self::Public(_) => "X-Shopify-Storefront-Access-Token",
            Self::Private(_) => "Shopify-Storefront-Private-Token",
        }
    }

    #[must_use]
    pub const fn secret(&self) -> &SecretString {
        match self {
            Self::Public(secret) | Self::Private(secret) => secret,
        }
    }
}

impl std::fmt::Debug for StorefrontToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Public(_) => "Public",
            Self::Private(_) => "Private",
        };
        f.debug_tuple(kind).field(&"[REDACTED]").finish()
    }
}

/// Shopify Storefront API configuration.
#[derive(Debug, Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store_domain: String,
    /// Shopify API version (e.g., 2024-01)
    pub api_version: String,
    /// Access token and the header it travels in
    pub token: StorefrontToken,
    /// Full endpoint URL, replacing the one derived from the domain
    pub endpoint_override: Option<String>,
    /// How long catalog reads stay cached
    pub cache_ttl: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env
            .get_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = env
            .get_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            shopify: ShopifyStorefrontConfig::load(&env)?,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyStorefrontConfig {
    /// Load only the Shopify settings (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(&Env(&|key: &str| std::env::var(key).ok()))
    }

    fn load(env: &Env<'_>) -> Result<Self, ConfigError> {
        let store_domain = env.required("SHOPIFY_STORE_DOMAIN")?;
        if store_domain.is_empty() || store_domain.contains("://") || store_domain.contains('/') {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPIFY_STORE_DOMAIN".to_string(),
                "expected a bare domain such as your-store.myshopify.com".to_string(),
            ));
        }

        let token = match env.optional("SHOPIFY_STOREFRONT_PRIVATE_TOKEN") {
            Some(private) => {
                validate_secret_strength(&private, "SHOPIFY_STOREFRONT_PRIVATE_TOKEN")?;
                StorefrontToken::Private(SecretString::from(private))
            }
            None => StorefrontToken::Public(SecretString::from(
                env.required("SHOPIFY_STOREFRONT_ACCESS_TOKEN")?,
            )),
        };

        let cache_ttl_secs = env
            .get_or_default("STOREFRONT_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;
        if cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_CACHE_TTL_SECS".to_string(),
                format!("must be at most {MAX_CACHE_TTL_SECS} seconds"),
            ));
        }

        let endpoint_override = env.optional("SHOPIFY_STOREFRONT_ENDPOINT");
        if let Some(endpoint) = &endpoint_override {
            url::Url::parse(endpoint).map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPIFY_STOREFRONT_ENDPOINT".to_string(), e.to_string())
            })?;
        }

        Ok(Self {
            store_domain,
            api_version: env.get_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            token,
            endpoint_override,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }

    /// The Storefront GraphQL endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.endpoint_override.clone().unwrap_or_else(|| {
            format!(
                "https://{}/api/{}/graphql.json",
                self.store_domain, self.api_version
            )
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source; empty values count as unset.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token Shopify generated."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    const PRIVATE_TOKEN: &str = "3f9c1a7be04d5f28c6a9e1b7d03f4c52";

    fn config_from(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-private-token", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength(PRIVATE_TOKEN, "TEST_VAR").is_ok());
    }

    #[test]
    fn test_defaults_with_public_token() {
        let config = config_from(&[
            ("SHOPIFY_STORE_DOMAIN", "harbor.myshopify.com"),
            ("SHOPIFY_STOREFRONT_ACCESS_TOKEN", "public-token"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.shopify.api_version, "2024-01");
        assert_eq!(config.shopify.cache_ttl, Duration::from_secs(300));
        assert_eq!(
            config.shopify.endpoint(),
            "https://harbor.myshopify.com/api/2024-01/graphql.json"
        );
        assert_eq!(
            config.shopify.token.header_name(),
            "X-Shopify-Storefront-Access-Token"
        );
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_private_token_wins() {
        let config = config_from(&[
            ("SHOPIFY_STORE_DOMAIN", "harbor.myshopify.com"),
            ("SHOPIFY_STOREFRONT_ACCESS_TOKEN", "public-token"),
            ("SHOPIFY_STOREFRONT_PRIVATE_TOKEN", PRIVATE_TOKEN),
        ])
        .unwrap();

        assert_eq!(
            config.shopify.token.header_name(),
            "Shopify-Storefront-Private-Token"
        );
        assert_eq!(config.shopify.token.secret().expose_secret(), PRIVATE_TOKEN);
    }

    #[test]
    fn test_placeholder_private_token_rejected() {
        let result = config_from(&[
            ("SHOPIFY_STORE_DOMAIN", "harbor.myshopify.com"),
            ("SHOPIFY_STOREFRONT_PRIVATE_TOKEN", "changeme"),
        ]);
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_missing_token() {
        let result = config_from(&[("SHOPIFY_STORE_DOMAIN", "harbor.myshopify.com")]);
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref k)) if k == "SHOPIFY_STOREFRONT_ACCESS_TOKEN")
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let result = config_from(&[
            ("SHOPIFY_STORE_DOMAIN", ""),
            ("SHOPIFY_STOREFRONT_ACCESS_TOKEN", "public-token"),
        ]);
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref k)) if k == "SHOPIFY_STORE_DOMAIN")
        );
    }

    #[test]
    fn test_domain_with_scheme_rejected() {
        let result = config_from(&[
            ("SHOPIFY_STORE_DOMAIN", "https://harbor.myshopify.com"),
            ("SHOPIFY_STOREFRONT_ACCESS_TOKEN", "public-token"),
        ]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SHOPIFY_STORE_DOMAIN", "harbor.myshopify.com"),
            ("SHOPIFY_STOREFRONT_ACCESS_TOKEN", "public-token"),
            ("SHOPIFY_API_VERSION", "2025-04"),
            ("SHOPIFY_STOREFRONT_ENDPOINT", "http://127.0.0.1:9999/graphql"),
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_CACHE_TTL_SECS", "5"),
            ("SENTRY_ENVIRONMENT", "staging"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.shopify.endpoint(), "http://127.0.0.1:9999/graphql");
        assert_eq!(config.shopify.cache_ttl, Duration::from_secs(5));
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_invalid_port() {
        let result = config_from(&[
            ("SHOPIFY_STORE_DOMAIN", "harbor.myshopify.com"),
            ("SHOPIFY_STOREFRONT_ACCESS_TOKEN", "public-token"),
            ("STOREFRONT_PORT", "eighty"),
        ]);
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar(ref k, _)) if k == "STOREFRONT_PORT")
        );
    }

    #[test]
    fn test_cache_ttl_upper_bound() {
        let result = config_from(&[
            ("SHOPIFY_STORE_DOMAIN", "harbor.myshopify.com"),
            ("SHOPIFY_STOREFRONT_ACCESS_TOKEN", "public-token"),
            ("STOREFRONT_CACHE_TTL_SECS", "99999999999"),
        ]);
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar(ref k, _)) if k == "STOREFRONT_CACHE_TTL_SECS")
        );

        let config = config_from(&[
            ("SHOPIFY_STORE_DOMAIN", "harbor.myshopify.com"),
            ("SHOPIFY_STOREFRONT_ACCESS_TOKEN", "public-token"),
            ("STOREFRONT_CACHE_TTL_SECS", "31536000"),
        ])
        .unwrap();
        assert_eq!(config.shopify.cache_ttl, Duration::from_secs(31_536_000));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let config = config_from(&[
            ("SHOPIFY_STORE_DOMAIN", "harbor.myshopify.com"),
            ("SHOPIFY_STOREFRONT_PRIVATE_TOKEN", PRIVATE_TOKEN),
        ])
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("harbor.myshopify.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(PRIVATE_TOKEN));
    }
}
