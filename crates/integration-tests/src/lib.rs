//! Integration test harness for Harbor.
//!
//! Everything runs in-process on ephemeral ports: a [`FakeShopify`] GraphQL
//! endpoint standing in for the Storefront API, and the real storefront
//! router pointed at it via [`spawn_storefront`].
//!
//! # Test Categories
//!
//! - `catalog` - product and collection reads, caching, tag invalidation
//! - `cart_proxy` - `/api/cart*` request validation and upstream mapping
//! - `cart_lifecycle` - `CartHolder` driving the proxy end to end
//!
//! # Example
//!
//! ```rust,ignore
//! let shopify = FakeShopify::spawn().await;
//! let storefront = spawn_storefront(&shopify, public_token()).await;
//! let resp = reqwest::get(format!("{}/api/products", storefront.base_url)).await?;
//! assert_eq!(shopify.calls("GetProducts"), 1);
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use harbor_storefront::config::{ShopifyStorefrontConfig, StorefrontConfig, StorefrontToken};
use harbor_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};

/// Token headers the Storefront API accepts.
const TOKEN_HEADERS: [&str; 2] = [
    "x-shopify-storefront-access-token",
    "shopify-storefront-private-token",
];

/// Public token for tests.
#[must_use]
pub fn public_token() -> StorefrontToken {
    StorefrontToken::Public(SecretString::from("public-test-token"))
}

/// Private token for tests.
#[must_use]
pub fn private_token() -> StorefrontToken {
    StorefrontToken::Private(SecretString::from("shpat_k9Qz7LmX2vR4tW8yB1nC"))
}

// =============================================================================
// Fake Storefront API
// =============================================================================

#[derive(Debug, Clone)]
struct FakeVariant {
    id: String,
    title: String,
    option: Option<(String, String)>,
    price_cents: u64,
    available: bool,
}

#[derive(Debug, Clone)]
struct FakeProduct {
    id: String,
    handle: String,
    title: String,
    option_name: Option<String>,
    variants: Vec<FakeVariant>,
}

#[derive(Debug, Clone)]
struct FakeLine {
    id: String,
    variant_id: String,
    quantity: u32,
}

/// Token header seen on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenToken {
    pub header: String,
    pub value: String,
}

#[derive(Debug, Default)]
struct FakeState {
    products: Vec<FakeProduct>,
    carts: HashMap<String, Vec<FakeLine>>,
    next_id: u32,
    calls: Vec<String>,
    tokens: Vec<Option<SeenToken>>,
    failing: bool,
}

/// In-process stand-in for the Shopify Storefront GraphQL endpoint.
///
/// Dispatches on `operationName`, keeps carts in memory, and records every
/// operation and token header it receives. Catalog: `classic-tee` (Size S/M),
/// `harbor-mug` (single default variant), and collection `summer` with both.
#[derive(Clone)]
pub struct FakeShopify {
    endpoint: String,
    state: Arc<Mutex<FakeState>>,
}

impl FakeShopify {
    /// Start the fake on an ephemeral port.
    pub async fn spawn() -> Self {
        let state = Arc::new(Mutex::new(FakeState {
            products: seed_catalog(),
            ..FakeState::default()
        }));

        let app = Router::new()
            .route("/graphql.json", post(graphql))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            endpoint: format!("http://{addr}/graphql.json"),
            state,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// How many times `operation` was requested.
    #[must_use]
    pub fn calls(&self, operation: &str) -> usize {
        self.lock().calls.iter().filter(|c| *c == operation).count()
    }

    /// Total requests received.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.lock().calls.len()
    }

    /// Token header of the most recent request.
    #[must_use]
    pub fn last_token(&self) -> Option<SeenToken> {
        self.lock().tokens.last().cloned().flatten()
    }

    /// Answer every request with a top-level GraphQL error.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Rename a product, as a merchant edit would.
    pub fn rename_product(&self, handle: &str, title: &str) {
        let mut state = self.lock();
        if let Some(product) = state.products.iter_mut().find(|p| p.handle == handle) {
            product.title = title.to_string();
        }
    }

    /// Carts created so far.
    #[must_use]
    pub fn cart_count(&self) -> usize {
        self.lock().carts.len()
    }

    /// Forget a cart, as Shopify does once one expires.
    pub fn expire_cart(&self, cart_id: &str) {
        self.lock().carts.remove(cart_id);
    }
}

fn seed_catalog() -> Vec<FakeProduct> {
    let size = |id: &str, value: &str, available: bool| FakeVariant {
        id: format!("gid://shopify/ProductVariant/{id}"),
        title: value.to_string(),
        option: Some(("Size".to_string(), value.to_string())),
        price_cents: 2500,
        available,
    };

    vec![
        FakeProduct {
            id: "gid://shopify/Product/1".to_string(),
            handle: "classic-tee".to_string(),
            title: "Classic Tee".to_string(),
            option_name: Some("Size".to_string()),
            variants: vec![size("11", "S", true), size("12", "M", false)],
        },
        FakeProduct {
            id: "gid://shopify/Product/2".to_string(),
            handle: "harbor-mug".to_string(),
            title: "Harbor Mug".to_string(),
            option_name: None,
            variants: vec![FakeVariant {
                id: "gid://shopify/ProductVariant/21".to_string(),
                title: "Default Title".to_string(),
                option: None,
                price_cents: 1450,
                available: true,
            }],
        },
    ]
}

fn money(cents: u64) -> Value {
    json!({
        "amount": format!("{}.{:02}", cents / 100, cents % 100),
        "currencyCode": "USD",
    })
}

fn connection(nodes: impl IntoIterator<Item = Value>) -> Value {
    json!({
        "edges": nodes.into_iter().map(|node| json!({ "node": node })).collect::<Vec<_>>(),
    })
}

fn image(handle: &str) -> Value {
    json!({
        "url": format!("https://cdn.shopify.test/{handle}.jpg"),
        "altText": null,
        "width": 800,
        "height": 800,
    })
}

fn selected_options(variant: &FakeVariant) -> Value {
    let (name, value) = variant
        .option
        .clone()
        .unwrap_or_else(|| ("Title".to_string(), "Default Title".to_string()));
    json!([{ "name": name, "value": value }])
}

fn render_product(product: &FakeProduct) -> Value {
    let (option_name, option_values) = product.option_name.as_ref().map_or_else(
        || ("Title".to_string(), vec!["Default Title".to_string()]),
        |name| {
            let values = product
                .variants
                .iter()
                .filter_map(|v| v.option.as_ref().map(|(_, value)| value.clone()))
                .collect();
            (name.clone(), values)
        },
    );
    let prices = product.variants.iter().map(|v| v.price_cents);
    let min = prices.clone().min().unwrap_or(0);
    let max = prices.max().unwrap_or(0);

    json!({
        "id": product.id,
        "handle": product.handle,
        "title": product.title,
        "description": format!("{} description", product.title),
        "descriptionHtml": format!("<p>{} description</p>", product.title),
        "availableForSale": product.variants.iter().any(|v| v.available),
        "vendor": "Harbor",
        "productType": "Apparel",
        "tags": ["new"],
        "createdAt": "2024-01-15T10:00:00Z",
        "updatedAt": "2024-02-01T10:00:00Z",
        "featuredImage": image(&product.handle),
        "images": connection([image(&product.handle)]),
        "options": [{
            "id": format!("{}/option", product.id),
            "name": option_name,
            "values": option_values,
        }],
        "priceRange": {
            "minVariantPrice": money(min),
            "maxVariantPrice": money(max),
        },
        "variants": connection(product.variants.iter().map(|v| json!({
            "id": v.id,
            "title": v.title,
            "availableForSale": v.available,
            "selectedOptions": selected_options(v),
            "price": money(v.price_cents),
            "compareAtPrice": null,
            "image": null,
        }))),
    })
}

fn render_collection(state: &FakeState, with_products: bool) -> Value {
    let mut collection = json!({
        "id": "gid://shopify/Collection/1",
        "handle": "summer",
        "title": "Summer",
        "description": "Warm weather picks",
        "updatedAt": "2024-03-01T00:00:00Z",
        "image": null,
    });
    if with_products {
        collection["products"] = connection(state.products.iter().map(render_product));
    }
    collection
}

fn find_variant<'a>(state: &'a FakeState, id: &str) -> Option<(&'a FakeProduct, &'a FakeVariant)> {
    state
        .products
        .iter()
        .find_map(|p| p.variants.iter().find(|v| v.id == id).map(|v| (p, v)))
}

fn render_cart(state: &FakeState, cart_id: &str) -> Value {
    let lines = &state.carts[cart_id];
    let mut subtotal = 0;
    let mut nodes = Vec::new();
    for line in lines {
        let Some((product, variant)) = find_variant(state, &line.variant_id) else {
            continue;
        };
        subtotal += variant.price_cents * u64::from(line.quantity);
        nodes.push(json!({
            "id": line.id,
            "quantity": line.quantity,
            "merchandise": {
                "id": variant.id,
                "title": variant.title,
                "selectedOptions": selected_options(variant),
                "product": {
                    "id": product.id,
                    "handle": product.handle,
                    "title": product.title,
                    "featuredImage": image(&product.handle),
                },
                "price": money(variant.price_cents),
            },
        }));
    }

    json!({
        "id": cart_id,
        "checkoutUrl": format!("https://harbor.test/cart/c/{}", cart_id.rsplit('/').next().unwrap_or_default()),
        "totalQuantity": lines.iter().map(|l| l.quantity).sum::<u32>(),
        "cost": {
            "subtotalAmount": money(subtotal),
            "totalAmount": money(subtotal),
            "totalTaxAmount": null,
        },
        "lines": connection(nodes),
    })
}

fn cart_payload(state: &FakeState, cart_id: &str) -> Value {
    json!({ "cart": render_cart(state, cart_id), "userErrors": [] })
}

fn user_error(field: &str, message: &str) -> Value {
    json!({ "cart": null, "userErrors": [{ "field": [field], "message": message }] })
}

fn str_var<'a>(variables: &'a Value, key: &str) -> &'a str {
    variables[key].as_str().unwrap_or_default()
}

fn token_of(headers: &HeaderMap) -> Option<SeenToken> {
    TOKEN_HEADERS.iter().find_map(|name| {
        headers.get(*name).map(|value| SeenToken {
            header: (*name).to_string(),
            value: value.to_str().unwrap_or_default().to_string(),
        })
    })
}

async fn graphql(
    State(state): State<Arc<Mutex<FakeState>>>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    let operation = request["operationName"].as_str().unwrap_or_default().to_string();
    let variables = &request["variables"];

    let mut state = state.lock().unwrap();
    state.calls.push(operation.clone());
    state.tokens.push(token_of(&headers));

    if state.failing {
        return Json(json!({ "errors": [{ "message": "Internal error. Looks like something went wrong on our end." }] }))
            .into_response();
    }

    let data = match operation.as_str() {
        "GetProducts" => {
            let first = usize::try_from(variables["first"].as_u64().unwrap_or(0)).unwrap_or(0);
            json!({ "products": connection(state.products.iter().take(first).map(render_product)) })
        }
        "GetProduct" => {
            let handle = str_var(variables, "handle");
            let product = state.products.iter().find(|p| p.handle == handle);
            json!({ "product": product.map(render_product) })
        }
        "GetCollections" => {
            json!({ "collections": connection([render_collection(&state, false)]) })
        }
        "GetCollection" => {
            let collection =
                (str_var(variables, "handle") == "summer").then(|| render_collection(&state, true));
            json!({ "collection": collection })
        }
        "CreateCart" => {
            state.next_id += 1;
            let id = format!("gid://shopify/Cart/c{}", state.next_id);
            state.carts.insert(id.clone(), Vec::new());
            json!({ "cartCreate": cart_payload(&state, &id) })
        }
        "GetCart" => {
            let id = str_var(variables, "cartId");
            let cart = state.carts.contains_key(id).then(|| render_cart(&state, id));
            json!({ "cart": cart })
        }
        "AddToCart" => json!({ "cartLinesAdd": add_lines(&mut state, variables) }),
        "UpdateCart" => json!({ "cartLinesUpdate": update_lines(&mut state, variables) }),
        "RemoveFromCart" => json!({ "cartLinesRemove": remove_lines(&mut state, variables) }),
        other => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": [{ "message": format!("unknown operation {other}") }] })),
            )
                .into_response();
        }
    };

    Json(json!({ "data": data })).into_response()
}

fn add_lines(state: &mut FakeState, variables: &Value) -> Value {
    let cart_id = str_var(variables, "cartId").to_string();
    if !state.carts.contains_key(&cart_id) {
        return user_error("cartId", "The specified cart does not exist.");
    }

    let inputs = variables["lines"].as_array().cloned().unwrap_or_default();
    for input in &inputs {
        let variant_id = str_var(input, "merchandiseId");
        if find_variant(state, variant_id).is_none() {
            return user_error("merchandiseId", "The merchandise with id does not exist.");
        }
    }

    for input in inputs {
        let variant_id = str_var(&input, "merchandiseId").to_string();
        let quantity = u32::try_from(input["quantity"].as_u64().unwrap_or(1)).unwrap_or(1);
        state.next_id += 1;
        let next_id = state.next_id;
        let lines = state.carts.get_mut(&cart_id).unwrap();
        if let Some(line) = lines.iter_mut().find(|l| l.variant_id == variant_id) {
            line.quantity += quantity;
        } else {
            lines.push(FakeLine {
                id: format!("gid://shopify/CartLine/l{next_id}"),
                variant_id,
                quantity,
            });
        }
    }
    cart_payload(state, &cart_id)
}

fn update_lines(state: &mut FakeState, variables: &Value) -> Value {
    let cart_id = str_var(variables, "cartId").to_string();
    let Some(lines) = state.carts.get_mut(&cart_id) else {
        return user_error("cartId", "The specified cart does not exist.");
    };

    for input in variables["lines"].as_array().into_iter().flatten() {
        let line_id = str_var(input, "id");
        let quantity = u32::try_from(input["quantity"].as_u64().unwrap_or(0)).unwrap_or(0);
        if quantity == 0 {
            lines.retain(|l| l.id != line_id);
        } else if let Some(line) = lines.iter_mut().find(|l| l.id == line_id) {
            line.quantity = quantity;
        }
    }
    cart_payload(state, &cart_id)
}

fn remove_lines(state: &mut FakeState, variables: &Value) -> Value {
    let cart_id = str_var(variables, "cartId").to_string();
    let Some(lines) = state.carts.get_mut(&cart_id) else {
        return user_error("cartId", "The specified cart does not exist.");
    };

    let ids: Vec<&str> = variables["lineIds"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .collect();
    lines.retain(|l| !ids.contains(&l.id.as_str()));
    cart_payload(state, &cart_id)
}

// =============================================================================
// Storefront under test
// =============================================================================

/// A running storefront wired to a [`FakeShopify`].
pub struct TestStorefront {
    /// `http://127.0.0.1:<port>`
    pub base_url: String,
    /// Shared with the running server, for cache invalidation in tests.
    pub state: AppState,
}

impl TestStorefront {
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Serve the storefront router on an ephemeral port.
pub async fn spawn_storefront(shopify: &FakeShopify, token: StorefrontToken) -> TestStorefront {
    spawn_storefront_with_ttl(shopify, token, Duration::from_secs(300)).await
}

/// [`spawn_storefront`] with a custom catalog cache lifetime.
pub async fn spawn_storefront_with_ttl(
    shopify: &FakeShopify,
    token: StorefrontToken,
    cache_ttl: Duration,
) -> TestStorefront {
    let config = StorefrontConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        shopify: ShopifyStorefrontConfig {
            store_domain: "harbor-test.myshopify.com".to_string(),
            api_version: "2024-01".to_string(),
            token,
            endpoint_override: Some(shopify.endpoint().to_string()),
            cache_ttl,
        },
        sentry_dsn: None,
        sentry_environment: None,
    };
    let state = AppState::new(config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = harbor_storefront::app(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestStorefront {
        base_url: format!("http://{addr}"),
        state,
    }
}
