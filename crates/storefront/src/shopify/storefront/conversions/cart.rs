//! Cart conversion functions.

use harbor_core::Cart;
use tracing::warn;

use crate::shopify::ShopifyError;
use crate::shopify::storefront::wire::{CartNode, CartPayload};

/// Flatten a cart node.
///
/// `totalQuantity` is kept as Shopify reported it; a mismatch with the line
/// quantities is only logged.
#[must_use]
pub fn convert_cart(node: CartNode) -> Cart {
    let cart = Cart {
        id: node.id,
        checkout_url: node.checkout_url,
        total_quantity: node.total_quantity,
        cost: node.cost,
        lines: node.lines.into_nodes().collect(),
    };

    // Lines beyond the first page are not fetched, so only an excess is suspicious.
    if cart.line_quantity_sum() > u64::from(cart.total_quantity) {
        warn!(
            cart_id = %cart.id,
            total_quantity = cart.total_quantity,
            line_quantity_sum = cart.line_quantity_sum(),
            "Cart totalQuantity is lower than the sum of its lines"
        );
    }

    cart
}

/// Extract the cart from a mutation payload.
///
/// # Errors
///
/// - `ShopifyError::UserError` if Shopify rejected the mutation input
/// - `ShopifyError::MissingData` if the payload or its cart is absent
pub fn cart_from_payload(
    payload: Option<CartPayload>,
    operation: &'static str,
) -> Result<Cart, ShopifyError> {
    let payload = payload.ok_or(ShopifyError::MissingData(operation))?;

    if !payload.user_errors.is_empty() {
        let messages = payload
            .user_errors
            .iter()
            .map(|e| e.describe())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ShopifyError::UserError(messages));
    }

    payload
        .cart
        .map(convert_cart)
        .ok_or(ShopifyError::MissingData(operation))
}
