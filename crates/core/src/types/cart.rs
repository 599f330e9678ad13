//! Cart types.
//!
//! A cart is created and priced by Shopify; every field here is the
//! platform's authoritative answer. Nothing is summed or priced locally.

use serde::{Deserialize, Serialize};

use super::catalog::{DEFAULT_VARIANT_TITLE, Image, SelectedOption};
use super::id::{CartId, CartLineId, ProductId, VariantId};
use super::price::Money;

/// Cost breakdown for a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub subtotal_amount: Money,
    pub total_amount: Money,
    /// Absent until tax can be estimated (e.g., before an address is known).
    pub total_tax_amount: Option<Money>,
}

/// Product summary attached to a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMerchandiseProduct {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    pub featured_image: Option<Image>,
}

/// The variant a cart line refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMerchandise {
    pub id: VariantId,
    pub title: String,
    pub selected_options: Vec<SelectedOption>,
    pub product: CartMerchandiseProduct,
    pub price: Money,
}

impl CartMerchandise {
    /// Variant title suitable for display, hidden for option-less products.
    #[must_use]
    pub fn variant_title(&self) -> Option<&str> {
        (self.title != DEFAULT_VARIANT_TITLE).then_some(self.title.as_str())
    }
}

/// One entry in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: CartLineId,
    pub quantity: u32,
    pub merchandise: CartMerchandise,
}

/// A Shopify cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Opaque, platform-issued cart ID.
    pub id: CartId,
    /// Hosted checkout URL for this cart.
    pub checkout_url: String,
    /// Total item count as reported by Shopify.
    pub total_quantity: u32,
    pub cost: CartCost,
    /// Lines in platform order.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Find a line by ID.
    #[must_use]
    pub fn line(&self, id: &CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.id == id)
    }

    /// Sum of line quantities.
    ///
    /// Only used to cross-check `total_quantity`; the platform value is the
    /// one to display.
    #[must_use]
    pub fn line_quantity_sum(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

/// Input for adding a variant to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: VariantId,
    pub quantity: u32,
}

/// Input for changing the quantity of an existing cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    pub id: CartLineId,
    pub quantity: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(amount: &str) -> Money {
        Money::parse(amount, "USD").unwrap()
    }

    fn line(id: u32, variant: u32, quantity: u32, title: &str) -> CartLine {
        CartLine {
            id: CartLineId::new(format!("gid://shopify/CartLine/{id}")),
            quantity,
            merchandise: CartMerchandise {
                id: VariantId::new(format!("gid://shopify/ProductVariant/{variant}")),
                title: title.to_string(),
                selected_options: vec![],
                product: CartMerchandiseProduct {
                    id: ProductId::new("gid://shopify/Product/1"),
                    handle: "tee".to_string(),
                    title: "Tee".to_string(),
                    featured_image: None,
                },
                price: usd("10.00"),
            },
        }
    }

    fn cart(lines: Vec<CartLine>) -> Cart {
        Cart {
            id: CartId::new("gid://shopify/Cart/abc"),
            checkout_url: "https://shop.example/cart/c/abc".to_string(),
            total_quantity: 3,
            cost: CartCost {
                subtotal_amount: usd("30.00"),
                total_amount: usd("30.00"),
                total_tax_amount: None,
            },
            lines,
        }
    }

    #[test]
    fn test_line_lookup() {
        let cart = cart(vec![line(1, 10, 1, "S"), line(2, 11, 2, "M")]);
        assert_eq!(
            cart.line(&CartLineId::new("gid://shopify/CartLine/2"))
                .unwrap()
                .quantity,
            2
        );
        assert!(cart.line(&CartLineId::new("gid://shopify/CartLine/9")).is_none());
    }

    #[test]
    fn test_line_quantity_sum() {
        let cart = cart(vec![line(1, 10, 1, "S"), line(2, 11, 2, "M")]);
        assert_eq!(cart.line_quantity_sum(), u64::from(cart.total_quantity));
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_variant_title_hides_default() {
        assert_eq!(line(1, 10, 1, "Default Title").merchandise.variant_title(), None);
        assert_eq!(line(1, 10, 1, "Large").merchandise.variant_title(), Some("Large"));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(cart(vec![])).unwrap();
        assert!(json.get("checkoutUrl").is_some());
        assert!(json.get("totalQuantity").is_some());
        assert!(json["cost"].get("subtotalAmount").is_some());
        assert!(json["cost"]["totalTaxAmount"].is_null());
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut json = serde_json::to_value(line(1, 10, 1, "S")).unwrap();
        json["quantity"] = serde_json::json!(-1);
        assert!(serde_json::from_value::<CartLine>(json).is_err());
    }
}
