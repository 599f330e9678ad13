//! Collection conversion functions.

use harbor_core::Collection;

use crate::shopify::ShopifyError;
use crate::shopify::storefront::wire::{CollectionNode, Connection};

use super::products::convert_product_connection;

/// Flatten a collection node. Collections fetched without products get an
/// empty product list.
///
/// # Errors
///
/// Fails if any contained product violates a catalog invariant.
pub fn convert_collection(node: CollectionNode) -> Result<Collection, ShopifyError> {
    let products = node
        .products
        .map(convert_product_connection)
        .transpose()?
        .unwrap_or_default();

    Ok(Collection {
        id: node.id,
        handle: node.handle,
        title: node.title,
        description: node.description,
        updated_at: node.updated_at,
        image: node.image,
        products,
    })
}

/// Flatten a collection connection, preserving order.
///
/// # Errors
///
/// Fails on the first collection that cannot be converted.
pub fn convert_collection_connection(
    connection: Connection<CollectionNode>,
) -> Result<Vec<Collection>, ShopifyError> {
    connection.into_nodes().map(convert_collection).collect()
}
