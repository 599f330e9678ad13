//! Harbor Core - Shared types library.
//!
//! This crate provides common types used across all Harbor components:
//! - `storefront` - Storefront API client and same-origin cart proxy
//! - `cart` - Client-side cart state holder
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used on both sides of the
//! cart proxy.
//!
//! # Modules
//!
//! - [`types`] - Typed Shopify IDs, money, catalog and cart types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
