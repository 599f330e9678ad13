//! Catalog commands.
//!
//! These talk to the Storefront API directly with the same configuration as
//! the server, so they need `SHOPIFY_STORE_DOMAIN` and a token.

use harbor_core::{Collection, PriceRange, Product, ProductVariant};
use harbor_storefront::config::{ConfigError, ShopifyStorefrontConfig};
use harbor_storefront::shopify::{ShopifyError, StorefrontClient};
use thiserror::Error;

/// Errors that can occur during catalog commands.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storefront API error: {0}")]
    Shopify(#[from] ShopifyError),

    #[error("No product with handle '{0}'")]
    ProductNotFound(String),

    #[error("No collection with handle '{0}'")]
    CollectionNotFound(String),
}

fn client() -> Result<StorefrontClient, LookupError> {
    let config = ShopifyStorefrontConfig::from_env()?;
    tracing::debug!(endpoint = %config.endpoint(), "Using Storefront API");
    Ok(StorefrontClient::new(&config))
}

/// List the newest products.
#[allow(clippy::print_stdout)]
pub async fn products(first: u32) -> Result<(), LookupError> {
    let products = client()?.get_products(first).await?;
    if products.is_empty() {
        println!("No products.");
    }
    for product in &products {
        println!("{}", product_row(product));
    }
    Ok(())
}

/// Show one product.
#[allow(clippy::print_stdout)]
pub async fn product(handle: &str) -> Result<(), LookupError> {
    let product = client()?
        .get_product(handle)
        .await?
        .ok_or_else(|| LookupError::ProductNotFound(handle.to_string()))?;
    println!("{}", product_detail(&product));
    Ok(())
}

/// List collections.
#[allow(clippy::print_stdout)]
pub async fn collections() -> Result<(), LookupError> {
    for collection in client()?.get_collections().await? {
        println!("{:<24} {}", collection.handle, collection.title);
    }
    Ok(())
}

/// Show one collection and its products.
#[allow(clippy::print_stdout)]
pub async fn collection(handle: &str) -> Result<(), LookupError> {
    let collection = client()?
        .get_collection(handle)
        .await?
        .ok_or_else(|| LookupError::CollectionNotFound(handle.to_string()))?;
    println!("{}", collection_detail(&collection));
    Ok(())
}

fn price_range(range: &PriceRange) -> String {
    if range.min_variant_price == range.max_variant_price {
        range.min_variant_price.format()
    } else {
        format!(
            "{} - {}",
            range.min_variant_price.format(),
            range.max_variant_price.format()
        )
    }
}

fn product_row(product: &Product) -> String {
    let sold_out = if product.available_for_sale {
        ""
    } else {
        "  (sold out)"
    };
    format!(
        "{:<24} {:<32} {}{sold_out}",
        product.handle,
        product.title,
        price_range(&product.price_range)
    )
}

fn product_detail(product: &Product) -> String {
    let mut out = format!(
        "{}\n  handle: {}\n  vendor: {}\n  price:  {}\n",
        product.title,
        product.handle,
        product.vendor,
        price_range(&product.price_range)
    );

    // Option-less products carry a single placeholder option; hide it.
    if !product.variants.iter().all(ProductVariant::is_default) {
        for option in &product.options {
            out.push_str(&format!("  {}: {}\n", option.name, option.values.join(", ")));
        }
    }

    out.push_str("  variants:\n");
    for variant in &product.variants {
        let mut price = variant.price.format();
        if variant.is_on_sale()
            && let Some(compare) = &variant.compare_at_price
        {
            price = format!("{price} (was {})", compare.format());
        }
        let availability = if variant.available_for_sale {
            ""
        } else {
            "  sold out"
        };
        out.push_str(&format!(
            "    {:<16} {:<12} {}{availability}\n",
            variant.title, price, variant.id
        ));
    }

    if let Some(variant) = product.default_variant() {
        out.push_str(&format!("  add to cart: harbor cart add {}\n", variant.id));
    }

    out.trim_end().to_string()
}

fn collection_detail(collection: &Collection) -> String {
    let mut out = collection.title.clone();
    if !collection.description.is_empty() {
        out.push_str(&format!("\n  {}", collection.description));
    }
    if collection.products.is_empty() {
        out.push_str("\n  (no products)");
    }
    for product in &collection.products {
        out.push_str(&format!("\n  {}", product_row(product)));
    }
    out
}
