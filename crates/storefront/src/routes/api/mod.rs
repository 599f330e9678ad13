//! JSON API handlers.

pub mod cart;
pub mod collections;
pub mod products;

use std::time::Duration;

/// Cache policy for catalog responses. Browsers keep a response for as long
/// as the server-side catalog cache does.
pub fn catalog_cache_control(ttl: Duration) -> String {
    format!("public, max-age={}", ttl.as_secs())
}
