//! Client-side cart state for the Harbor storefront.
//!
//! Talks to the storefront's same-origin cart proxy (never to Shopify
//! directly) and keeps one current cart per session. The cart ID survives
//! restarts through a [`CartIdStore`].
//!
//! ```rust,ignore
//! use harbor_cart::{CartApi, CartHolder, FileCartIdStore};
//!
//! let api = CartApi::new("http://127.0.0.1:3000")?;
//! let holder = CartHolder::new(api, FileCartIdStore::new(".harbor/cart.json"));
//! holder.init().await;
//! holder.add_item(variant_id, None).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod error;
pub mod holder;
pub mod store;

pub use api::CartApi;
pub use error::{CartClientError, ClientResult, StoreError};
pub use holder::{CartHolder, CartState};
pub use store::{CART_ID_KEY, CartIdStore, FileCartIdStore, MemoryCartIdStore};
