//! Newtype IDs for type-safe references to Shopify global IDs.
//!
//! Shopify identifies every object with an opaque global ID string such as
//! `gid://shopify/ProductVariant/42`. Use the `define_gid!` macro to create
//! wrappers that prevent accidentally passing a line ID where a variant ID
//! is expected.

/// Macro to define a type-safe global ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Accessors: `new()`, `as_str()`
/// - `From<String>`, `From<&str>`, `AsRef<str>` and `Display`
///
/// # Example
///
/// ```rust
/// # use harbor_core::define_gid;
/// define_gid!(VariantId);
/// define_gid!(CartLineId);
///
/// let variant = VariantId::new("gid://shopify/ProductVariant/1");
/// assert_eq!(variant.as_str(), "gid://shopify/ProductVariant/1");
///
/// // These are different types, so this won't compile:
/// // let _: CartLineId = variant;
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw global ID string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw ID string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_gid!(ProductId);
define_gid!(ProductOptionId);
define_gid!(VariantId);
define_gid!(CollectionId);
define_gid!(CartId);
define_gid!(CartLineId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_transparent() {
        let id = CartLineId::new("gid://shopify/CartLine/1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"gid://shopify/CartLine/1\"");

        let parsed: CartLineId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_display_and_conversions() {
        let id = CollectionId::from("gid://shopify/Collection/7");
        assert_eq!(id.to_string(), "gid://shopify/Collection/7");
        assert_eq!(id.as_ref(), "gid://shopify/Collection/7");
        let raw: String = id.into();
        assert_eq!(raw, "gid://shopify/Collection/7");
    }
}
