//! Flatten Storefront API wire shapes into domain types.
//!
//! Every list comes out in the order Shopify sent it and with the same
//! length. Products are checked against catalog invariants on the way out.

pub mod cart;
pub mod collections;
pub mod products;

pub use cart::{cart_from_payload, convert_cart};
pub use collections::{convert_collection, convert_collection_connection};
pub use products::{convert_product, convert_product_connection};
