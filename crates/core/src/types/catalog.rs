//! Catalog types: products, variants and collections.
//!
//! These are the flattened shapes handed to callers. The nested
//! edge/node connection wrappers used on the wire never leave the
//! storefront client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{CollectionId, ProductId, ProductOptionId, VariantId};
use super::price::Money;

/// Title Shopify assigns to the only variant of a product without options.
pub const DEFAULT_VARIANT_TITLE: &str = "Default Title";

/// Violations of catalog invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A variant selects an option the product does not declare.
    #[error("variant {variant} selects undeclared option '{option}'")]
    UndeclaredOption { variant: VariantId, option: String },
}

/// Product or collection image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image URL on the Shopify CDN.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Width in pixels.
    pub width: Option<u32>,
    /// Height in pixels.
    pub height: Option<u32>,
}

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Selected value (e.g., "Large").
    pub value: String,
}

impl SelectedOption {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Product option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option ID.
    pub id: ProductOptionId,
    /// Option name (e.g., "Size").
    pub name: String,
    /// Allowed values (e.g., `["Small", "Medium", "Large"]`).
    pub values: Vec<String>,
}

/// Price range across a product's variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_variant_price: Money,
    pub max_variant_price: Money,
}

/// A purchasable configuration of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    /// Combination of option values (or "Default Title").
    pub title: String,
    pub available_for_sale: bool,
    pub selected_options: Vec<SelectedOption>,
    pub price: Money,
    /// Original price when the variant is on sale.
    pub compare_at_price: Option<Money>,
    pub image: Option<Image>,
}

impl ProductVariant {
    /// Whether this is the placeholder variant of an option-less product.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.title == DEFAULT_VARIANT_TITLE
    }

    /// Whether the variant is discounted relative to its compare-at price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price
            .as_ref()
            .is_some_and(|compare| compare.amount > self.price.amount)
    }
}

/// A product in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    pub title: String,
    /// Plain text description.
    pub description: String,
    pub description_html: String,
    /// Whether any variant is available.
    pub available_for_sale: bool,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub featured_image: Option<Image>,
    pub images: Vec<Image>,
    pub options: Vec<ProductOption>,
    pub price_range: PriceRange,
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Check that every variant only selects options declared on the product.
    ///
    /// # Errors
    ///
    /// Returns the first `CatalogError::UndeclaredOption` found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for variant in &self.variants {
            for selected in &variant.selected_options {
                if !self.options.iter().any(|o| o.name == selected.name) {
                    return Err(CatalogError::UndeclaredOption {
                        variant: variant.id.clone(),
                        option: selected.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Find the variant matching a complete selection of option values.
    ///
    /// The selection must name every product option exactly once; partial
    /// selections match nothing.
    #[must_use]
    pub fn find_variant(&self, selection: &[SelectedOption]) -> Option<&ProductVariant> {
        let complete = selection.len() == self.options.len()
            && self
                .options
                .iter()
                .all(|o| selection.iter().filter(|s| s.name == o.name).count() == 1);
        if !complete {
            return None;
        }

        self.variants.iter().find(|variant| {
            variant.selected_options.len() == selection.len()
                && selection
                    .iter()
                    .all(|s| variant.selected_options.contains(s))
        })
    }

    /// First variant available for sale, falling back to the first variant.
    #[must_use]
    pub fn default_variant(&self) -> Option<&ProductVariant> {
        self.variants
            .iter()
            .find(|v| v.available_for_sale)
            .or_else(|| self.variants.first())
    }
}

/// A collection of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    /// URL handle.
    pub handle: String,
    pub title: String,
    pub description: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub image: Option<Image>,
    /// Empty unless the collection was fetched with its products.
    pub products: Vec<Product>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(amount: &str) -> Money {
        Money::parse(amount, "USD").unwrap()
    }

    fn variant(id: u32, size: &str, color: &str) -> ProductVariant {
        ProductVariant {
            id: VariantId::new(format!("gid://shopify/ProductVariant/{id}")),
            title: format!("{size} / {color}"),
            available_for_sale: id != 1,
            selected_options: vec![
                SelectedOption::new("Size", size),
                SelectedOption::new("Color", color),
            ],
            price: usd("20.00"),
            compare_at_price: None,
            image: None,
        }
    }

    fn product() -> Product {
        Product {
            id: ProductId::new("gid://shopify/Product/1"),
            handle: "tee".to_string(),
            title: "Tee".to_string(),
            description: String::new(),
            description_html: String::new(),
            available_for_sale: true,
            vendor: "Harbor".to_string(),
            product_type: "Shirts".to_string(),
            tags: vec![],
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            updated_at: "2024-01-02T00:00:00Z".parse().unwrap(),
            featured_image: None,
            images: vec![],
            options: vec![
                ProductOption {
                    id: ProductOptionId::new("gid://shopify/ProductOption/1"),
                    name: "Size".to_string(),
                    values: vec!["S".to_string(), "M".to_string()],
                },
                ProductOption {
                    id: ProductOptionId::new("gid://shopify/ProductOption/2"),
                    name: "Color".to_string(),
                    values: vec!["Red".to_string(), "Blue".to_string()],
                },
            ],
            price_range: PriceRange {
                min_variant_price: usd("20.00"),
                max_variant_price: usd("20.00"),
            },
            variants: vec![
                variant(1, "S", "Red"),
                variant(2, "S", "Blue"),
                variant(3, "M", "Red"),
            ],
        }
    }

    #[test]
    fn test_find_variant_complete_selection() {
        let product = product();
        let found = product
            .find_variant(&[
                SelectedOption::new("Color", "Blue"),
                SelectedOption::new("Size", "S"),
            ])
            .unwrap();
        assert_eq!(found.id.as_str(), "gid://shopify/ProductVariant/2");
    }

    #[test]
    fn test_find_variant_partial_selection() {
        let product = product();
        assert!(
            product
                .find_variant(&[SelectedOption::new("Size", "S")])
                .is_none()
        );
    }

    #[test]
    fn test_find_variant_missing_combination() {
        let product = product();
        assert!(
            product
                .find_variant(&[
                    SelectedOption::new("Size", "M"),
                    SelectedOption::new("Color", "Blue"),
                ])
                .is_none()
        );
    }

    #[test]
    fn test_find_variant_duplicate_option_name() {
        let product = product();
        assert!(
            product
                .find_variant(&[
                    SelectedOption::new("Size", "S"),
                    SelectedOption::new("Size", "M"),
                ])
                .is_none()
        );
    }

    #[test]
    fn test_validate_accepts_declared_options() {
        assert!(product().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_undeclared_option() {
        let mut product = product();
        product.variants[0]
            .selected_options
            .push(SelectedOption::new("Material", "Cotton"));

        let err = product.validate().unwrap_err();
        assert_eq!(
            err,
            CatalogError::UndeclaredOption {
                variant: VariantId::new("gid://shopify/ProductVariant/1"),
                option: "Material".to_string(),
            }
        );
    }

    #[test]
    fn test_default_variant_prefers_available() {
        let product = product();
        assert_eq!(
            product.default_variant().unwrap().id.as_str(),
            "gid://shopify/ProductVariant/2"
        );
    }

    #[test]
    fn test_is_on_sale() {
        let mut v = variant(2, "S", "Blue");
        assert!(!v.is_on_sale());
        v.compare_at_price = Some(usd("25.00"));
        assert!(v.is_on_sale());
    }

    #[test]
    fn test_is_default() {
        let mut v = variant(2, "S", "Blue");
        assert!(!v.is_default());
        v.title = DEFAULT_VARIANT_TITLE.to_string();
        assert!(v.is_default());
    }
}
