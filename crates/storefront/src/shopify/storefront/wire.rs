//! Response shapes exactly as the Storefront API sends them.
//!
//! Lists arrive wrapped in `{ edges: [{ node }] }` connections. These types
//! only exist long enough to be flattened by `conversions`; leaf objects
//! (images, money, options) already match the domain types and are reused.

use chrono::{DateTime, Utc};
use harbor_core::{
    CartCost, CartId, CartLine, CollectionId, Image, PriceRange, ProductId, ProductOption,
    ProductVariant,
};
use serde::Deserialize;

/// A GraphQL connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

/// A single edge of a connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    /// Nodes in edge order.
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|edge| edge.node)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub available_for_sale: bool,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub featured_image: Option<Image>,
    pub images: Connection<Image>,
    pub options: Vec<ProductOption>,
    pub price_range: PriceRange,
    pub variants: Connection<ProductVariant>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionNode {
    pub id: CollectionId,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub image: Option<Image>,
    /// Only requested when fetching a single collection.
    #[serde(default)]
    pub products: Option<Connection<ProductNode>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartNode {
    pub id: CartId,
    pub checkout_url: String,
    pub total_quantity: u32,
    pub cost: CartCost,
    pub lines: Connection<CartLine>,
}

/// Payload shared by every cart mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub cart: Option<CartNode>,
    #[serde(default)]
    pub user_errors: Vec<CartUserError>,
}

/// A validation error reported by a cart mutation.
#[derive(Debug, Clone, Deserialize)]
pub struct CartUserError {
    pub field: Option<Vec<String>>,
    pub message: String,
}

impl CartUserError {
    /// `message` prefixed with the offending field path, if any.
    pub fn describe(&self) -> String {
        match &self.field {
            Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), self.message),
            _ => self.message.clone(),
        }
    }
}
