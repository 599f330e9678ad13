//! Core types for the Harbor storefront.
//!
//! This module provides type-safe wrappers for the commerce domain.

pub mod cart;
pub mod catalog;
pub mod id;
pub mod price;

pub use cart::*;
pub use catalog::*;
pub use id::*;
pub use price::{CurrencyCode, Money, MoneyError};
