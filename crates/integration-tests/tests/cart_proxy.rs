//! `/api/cart*` through the storefront to the fake Storefront API.

#![allow(clippy::unwrap_used)]

use harbor_integration_tests::{FakeShopify, TestStorefront, public_token, spawn_storefront};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

async fn post(storefront: &TestStorefront, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Client::new().post(storefront.url(path));
    if let Some(body) = body {
        request = request.json(&body);
    }
    let resp = request.send().await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

async fn get(storefront: &TestStorefront, path: &str) -> (StatusCode, Value) {
    let resp = reqwest::get(storefront.url(path)).await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

async fn get_cart(storefront: &TestStorefront, cart_id: &str) -> (StatusCode, Value) {
    let url = url::Url::parse_with_params(&storefront.url("/api/cart"), [("cartId", cart_id)]).unwrap();
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

async fn setup() -> (FakeShopify, TestStorefront) {
    let shopify = FakeShopify::spawn().await;
    let storefront = spawn_storefront(&shopify, public_token()).await;
    (shopify, storefront)
}

async fn new_cart(storefront: &TestStorefront) -> String {
    let (status, body) = post(storefront, "/api/cart", None).await;
    assert_eq!(status, StatusCode::OK);
    body["cart"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_cart() {
    let (shopify, storefront) = setup().await;

    let (status, body) = post(&storefront, "/api/cart", None).await;

    assert_eq!(status, StatusCode::OK);
    let cart = &body["cart"];
    assert!(cart["id"].as_str().unwrap().starts_with("gid://shopify/Cart/"));
    assert!(cart["checkoutUrl"].as_str().unwrap().starts_with("https://"));
    assert_eq!(cart["totalQuantity"], 0);
    assert_eq!(cart["lines"], json!([]));
    assert_eq!(shopify.cart_count(), 1);
}

#[tokio::test]
async fn test_add_merges_same_variant() {
    let (_shopify, storefront) = setup().await;
    let cart_id = new_cart(&storefront).await;

    let (status, _) = post(
        &storefront,
        "/api/cart/add",
        Some(json!({ "cartId": cart_id, "variantId": "gid://shopify/ProductVariant/11" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(
        &storefront,
        "/api/cart/add",
        Some(json!({ "cartId": cart_id, "variantId": "gid://shopify/ProductVariant/11", "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let cart = &body["cart"];
    assert_eq!(cart["totalQuantity"], 3);
    assert_eq!(cart["lines"].as_array().unwrap().len(), 1);
    assert_eq!(cart["lines"][0]["quantity"], 3);
    assert_eq!(cart["lines"][0]["merchandise"]["product"]["handle"], "classic-tee");
    assert_eq!(cart["cost"]["subtotalAmount"]["amount"], "75.00");
}

#[tokio::test]
async fn test_get_cart_is_never_cached() {
    let (shopify, storefront) = setup().await;
    let cart_id = new_cart(&storefront).await;

    let (_, first) = get_cart(&storefront, &cart_id).await;
    assert_eq!(first["cart"]["totalQuantity"], 0);

    post(
        &storefront,
        "/api/cart/add",
        Some(json!({ "cartId": cart_id, "variantId": "gid://shopify/ProductVariant/21" })),
    )
    .await;

    let (_, second) = get_cart(&storefront, &cart_id).await;
    assert_eq!(second["cart"]["totalQuantity"], 1);
    assert_eq!(shopify.calls("GetCart"), 2);
}

#[tokio::test]
async fn test_get_unknown_cart_is_null() {
    let (_shopify, storefront) = setup().await;

    let (status, body) = get_cart(&storefront, "gid://shopify/Cart/gone").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "cart": null }));
}

#[tokio::test]
async fn test_update_to_zero_and_remove() {
    let (_shopify, storefront) = setup().await;
    let cart_id = new_cart(&storefront).await;

    for variant in ["gid://shopify/ProductVariant/11", "gid://shopify/ProductVariant/21"] {
        post(
            &storefront,
            "/api/cart/add",
            Some(json!({ "cartId": cart_id, "variantId": variant })),
        )
        .await;
    }
    let (_, body) = get_cart(&storefront, &cart_id).await;
    let tee_line = body["cart"]["lines"][0]["id"].as_str().unwrap().to_string();
    let mug_line = body["cart"]["lines"][1]["id"].as_str().unwrap().to_string();

    let (status, body) = post(
        &storefront,
        "/api/cart/update",
        Some(json!({ "cartId": cart_id, "lineId": tee_line, "quantity": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"]["lines"].as_array().unwrap().len(), 1);
    assert_eq!(body["cart"]["lines"][0]["id"], mug_line.as_str());

    let (status, body) = post(
        &storefront,
        "/api/cart/remove",
        Some(json!({ "cartId": cart_id, "lineId": mug_line })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"]["totalQuantity"], 0);
}

#[tokio::test]
async fn test_validation_never_reaches_shopify() {
    let (shopify, storefront) = setup().await;

    let cases = [
        ("/api/cart/add", json!({ "cartId": "c" }), "Cart ID and Variant ID required"),
        ("/api/cart/update", json!({ "cartId": "c", "lineId": "l" }), "Cart ID, Line ID, and quantity required"),
        ("/api/cart/remove", json!({ "lineId": "l" }), "Cart ID and Line ID required"),
    ];
    for (path, body, message) in cases {
        let (status, body) = post(&storefront, path, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": message }));
    }

    let (status, body) = get(&storefront, "/api/cart").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Cart ID required" }));

    assert_eq!(shopify.total_calls(), 0);
}

#[tokio::test]
async fn test_user_errors_become_generic_500() {
    let (_shopify, storefront) = setup().await;

    let (status, body) = post(
        &storefront,
        "/api/cart/add",
        Some(json!({ "cartId": "gid://shopify/Cart/missing", "variantId": "gid://shopify/ProductVariant/11" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to add to cart" }));
}

#[tokio::test]
async fn test_upstream_failure_messages() {
    let (shopify, storefront) = setup().await;
    shopify.set_failing(true);

    let (status, body) = post(&storefront, "/api/cart", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to create cart" }));

    let (status, body) = get(&storefront, "/api/cart?cartId=c1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch cart" }));

    let (status, body) = post(
        &storefront,
        "/api/cart/update",
        Some(json!({ "cartId": "c1", "lineId": "l1", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to update cart" }));
}
