//! GraphQL operations for the Shopify Storefront API.
//!
//! Each operation lives in its own module holding the document, its
//! operation name, and typed `Variables`/`ResponseData`, the same layout
//! `graphql_client`'s derive generates. Documents are assembled from shared
//! fragments at compile time with `concat!`.

use graphql_client::{GraphQLQuery, QueryBody};

// Fragments are macros rather than consts so `concat!` can splice them.

macro_rules! image_fragment {
    () => {
        "fragment ImageFields on Image { url altText width height }\n"
    };
}

macro_rules! money_fragment {
    () => {
        "fragment MoneyFields on MoneyV2 { amount currencyCode }\n"
    };
}

macro_rules! product_fragment {
    () => {
        concat!(
            "fragment ProductFields on Product {\n",
            "  id handle title description descriptionHtml availableForSale\n",
            "  vendor productType tags createdAt updatedAt\n",
            "  featuredImage { ...ImageFields }\n",
            "  images(first: 10) { edges { node { ...ImageFields } } }\n",
            "  options { id name values }\n",
            "  priceRange {\n",
            "    minVariantPrice { ...MoneyFields }\n",
            "    maxVariantPrice { ...MoneyFields }\n",
            "  }\n",
            "  variants(first: 100) { edges { node {\n",
            "    id title availableForSale\n",
            "    selectedOptions { name value }\n",
            "    price { ...MoneyFields }\n",
            "    compareAtPrice { ...MoneyFields }\n",
            "    image { ...ImageFields }\n",
            "  } } }\n",
            "}\n",
        )
    };
}

macro_rules! collection_fragment {
    () => {
        concat!(
            "fragment CollectionFields on Collection {\n",
            "  id handle title description updatedAt\n",
            "  image { ...ImageFields }\n",
            "}\n",
        )
    };
}

macro_rules! cart_fragment {
    () => {
        concat!(
            "fragment CartFields on Cart {\n",
            "  id checkoutUrl totalQuantity\n",
            "  cost {\n",
            "    subtotalAmount { ...MoneyFields }\n",
            "    totalAmount { ...MoneyFields }\n",
            "    totalTaxAmount { ...MoneyFields }\n",
            "  }\n",
            "  lines(first: 100) { edges { node {\n",
            "    id quantity\n",
            "    merchandise { ... on ProductVariant {\n",
            "      id title\n",
            "      selectedOptions { name value }\n",
            "      product { id handle title featuredImage { ...ImageFields } }\n",
            "      price { ...MoneyFields }\n",
            "    } }\n",
            "  } } }\n",
            "}\n",
        )
    };
}

macro_rules! cart_payload {
    () => {
        "cart { ...CartFields } userErrors { field message }"
    };
}

/// Wire up a query module to the `GraphQLQuery` trait.
macro_rules! graphql_operation {
    ($name:ident, $module:ident) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

// =============================================================================
// Products
// =============================================================================

graphql_operation!(GetProducts, get_products);

pub mod get_products {
    use serde::{Deserialize, Serialize};

    use crate::shopify::storefront::wire::{Connection, ProductNode};

    pub const OPERATION_NAME: &str = "GetProducts";
    pub const QUERY: &str = concat!(
        "query GetProducts($first: Int!) {\n",
        "  products(first: $first, sortKey: CREATED_AT, reverse: true) {\n",
        "    edges { node { ...ProductFields } }\n",
        "  }\n",
        "}\n",
        product_fragment!(),
        image_fragment!(),
        money_fragment!(),
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Connection<ProductNode>,
    }
}

graphql_operation!(GetProduct, get_product);

pub mod get_product {
    use serde::{Deserialize, Serialize};

    use crate::shopify::storefront::wire::ProductNode;

    pub const OPERATION_NAME: &str = "GetProduct";
    pub const QUERY: &str = concat!(
        "query GetProduct($handle: String!) {\n",
        "  product(handle: $handle) { ...ProductFields }\n",
        "}\n",
        product_fragment!(),
        image_fragment!(),
        money_fragment!(),
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductNode>,
    }
}

// =============================================================================
// Collections
// =============================================================================

graphql_operation!(GetCollections, get_collections);

pub mod get_collections {
    use serde::{Deserialize, Serialize};

    use crate::shopify::storefront::wire::{CollectionNode, Connection};

    pub const OPERATION_NAME: &str = "GetCollections";
    pub const QUERY: &str = concat!(
        "query GetCollections {\n",
        "  collections(first: 100) {\n",
        "    edges { node { ...CollectionFields } }\n",
        "  }\n",
        "}\n",
        collection_fragment!(),
        image_fragment!(),
    );

    #[derive(Debug, Clone, Default, Serialize)]
    pub struct Variables {}

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collections: Connection<CollectionNode>,
    }
}

graphql_operation!(GetCollection, get_collection);

pub mod get_collection {
    use serde::{Deserialize, Serialize};

    use crate::shopify::storefront::wire::CollectionNode;

    pub const OPERATION_NAME: &str = "GetCollection";
    pub const QUERY: &str = concat!(
        "query GetCollection($handle: String!) {\n",
        "  collection(handle: $handle) {\n",
        "    ...CollectionFields\n",
        "    products(first: 100) { edges { node { ...ProductFields } } }\n",
        "  }\n",
        "}\n",
        collection_fragment!(),
        product_fragment!(),
        image_fragment!(),
        money_fragment!(),
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<CollectionNode>,
    }
}

// =============================================================================
// Cart
// =============================================================================

graphql_operation!(CreateCart, create_cart);

pub mod create_cart {
    use serde::{Deserialize, Serialize};

    use crate::shopify::storefront::wire::CartPayload;

    pub const OPERATION_NAME: &str = "CreateCart";
    pub const QUERY: &str = concat!(
        "mutation CreateCart {\n",
        "  cartCreate { ",
        cart_payload!(),
        " }\n",
        "}\n",
        cart_fragment!(),
        image_fragment!(),
        money_fragment!(),
    );

    #[derive(Debug, Clone, Default, Serialize)]
    pub struct Variables {}

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartPayload>,
    }
}

graphql_operation!(GetCart, get_cart);

pub mod get_cart {
    use harbor_core::CartId;
    use serde::{Deserialize, Serialize};

    use crate::shopify::storefront::wire::CartNode;

    pub const OPERATION_NAME: &str = "GetCart";
    pub const QUERY: &str = concat!(
        "query GetCart($cartId: ID!) {\n",
        "  cart(id: $cartId) { ...CartFields }\n",
        "}\n",
        cart_fragment!(),
        image_fragment!(),
        money_fragment!(),
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CartNode>,
    }
}

graphql_operation!(AddToCart, add_to_cart);

pub mod add_to_cart {
    use harbor_core::{CartId, CartLineInput};
    use serde::{Deserialize, Serialize};

    use crate::shopify::storefront::wire::CartPayload;

    pub const OPERATION_NAME: &str = "AddToCart";
    pub const QUERY: &str = concat!(
        "mutation AddToCart($cartId: ID!, $lines: [CartLineInput!]!) {\n",
        "  cartLinesAdd(cartId: $cartId, lines: $lines) { ",
        cart_payload!(),
        " }\n",
        "}\n",
        cart_fragment!(),
        image_fragment!(),
        money_fragment!(),
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartPayload>,
    }
}

graphql_operation!(UpdateCart, update_cart);

pub mod update_cart {
    use harbor_core::{CartId, CartLineUpdateInput};
    use serde::{Deserialize, Serialize};

    use crate::shopify::storefront::wire::CartPayload;

    pub const OPERATION_NAME: &str = "UpdateCart";
    pub const QUERY: &str = concat!(
        "mutation UpdateCart($cartId: ID!, $lines: [CartLineUpdateInput!]!) {\n",
        "  cartLinesUpdate(cartId: $cartId, lines: $lines) { ",
        cart_payload!(),
        " }\n",
        "}\n",
        cart_fragment!(),
        image_fragment!(),
        money_fragment!(),
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub lines: Vec<CartLineUpdateInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_update: Option<CartPayload>,
    }
}

graphql_operation!(RemoveFromCart, remove_from_cart);

pub mod remove_from_cart {
    use harbor_core::{CartId, CartLineId};
    use serde::{Deserialize, Serialize};

    use crate::shopify::storefront::wire::CartPayload;

    pub const OPERATION_NAME: &str = "RemoveFromCart";
    pub const QUERY: &str = concat!(
        "mutation RemoveFromCart($cartId: ID!, $lineIds: [ID!]!) {\n",
        "  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) { ",
        cart_payload!(),
        " }\n",
        "}\n",
        cart_fragment!(),
        image_fragment!(),
        money_fragment!(),
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub line_ids: Vec<CartLineId>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_remove: Option<CartPayload>,
    }
}
