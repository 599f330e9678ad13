//! Product conversion functions.

use harbor_core::Product;

use crate::shopify::ShopifyError;
use crate::shopify::storefront::wire::{Connection, ProductNode};

/// Flatten a product node and check its option invariant.
///
/// # Errors
///
/// Returns `ShopifyError::InvalidCatalog` if a variant selects an option the
/// product does not declare.
pub fn convert_product(node: ProductNode) -> Result<Product, ShopifyError> {
    let product = Product {
        id: node.id,
        handle: node.handle,
        title: node.title,
        description: node.description,
        description_html: node.description_html,
        available_for_sale: node.available_for_sale,
        vendor: node.vendor,
        product_type: node.product_type,
        tags: node.tags,
        created_at: node.created_at,
        updated_at: node.updated_at,
        featured_image: node.featured_image,
        images: node.images.into_nodes().collect(),
        options: node.options,
        price_range: node.price_range,
        variants: node.variants.into_nodes().collect(),
    };
    product.validate()?;
    Ok(product)
}

/// Flatten a product connection, preserving order.
///
/// # Errors
///
/// Fails on the first product that violates a catalog invariant.
pub fn convert_product_connection(
    connection: Connection<ProductNode>,
) -> Result<Vec<Product>, ShopifyError> {
    connection.into_nodes().map(convert_product).collect()
}
