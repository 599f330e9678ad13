//! `CartHolder` driving the storefront proxy end to end.

#![allow(clippy::unwrap_used)]

use harbor_cart::{CartApi, CartHolder, CartIdStore, FileCartIdStore};
use harbor_core::{CartId, VariantId};
use harbor_integration_tests::{FakeShopify, TestStorefront, public_token, spawn_storefront};

fn state_file(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "harbor-lifecycle-{}-{name}.json",
        std::process::id()
    ))
}

fn holder(storefront: &TestStorefront, path: &std::path::Path) -> CartHolder<FileCartIdStore> {
    CartHolder::new(
        CartApi::new(&storefront.base_url).unwrap(),
        FileCartIdStore::new(path),
    )
}

#[tokio::test]
async fn test_session_survives_restart() {
    let shopify = FakeShopify::spawn().await;
    let storefront = spawn_storefront(&shopify, public_token()).await;
    let path = state_file("restart");
    let _ = std::fs::remove_file(&path);

    let first = holder(&storefront, &path);
    first.init().await;
    first
        .add_item(VariantId::new("gid://shopify/ProductVariant/11"), Some(2))
        .await;
    let cart_id = first.cart().await.unwrap().id;
    assert!(first.state().await.is_open);

    // A new session reading the same file picks the cart back up.
    let second = holder(&storefront, &path);
    second.init().await;
    let restored = second.cart().await.unwrap();
    assert_eq!(restored.id, cart_id);
    assert_eq!(restored.total_quantity, 2);
    assert!(!second.state().await.is_open);
    assert_eq!(shopify.calls("CreateCart"), 1);

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_expired_cart_is_replaced_and_persisted() {
    let shopify = FakeShopify::spawn().await;
    let storefront = spawn_storefront(&shopify, public_token()).await;
    let path = state_file("expired");
    let _ = std::fs::remove_file(&path);

    let first = holder(&storefront, &path);
    first.init().await;
    let old_id = first.cart().await.unwrap().id;
    shopify.expire_cart(old_id.as_str());

    let second = holder(&storefront, &path);
    second.init().await;
    let new_id = second.cart().await.unwrap().id;

    assert_ne!(new_id, old_id);
    assert_eq!(FileCartIdStore::new(&path).load().unwrap(), Some(new_id));
    assert_eq!(shopify.calls("GetCart"), 1);
    assert_eq!(shopify.calls("CreateCart"), 2);

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_edit_lines() {
    let shopify = FakeShopify::spawn().await;
    let storefront = spawn_storefront(&shopify, public_token()).await;
    let path = state_file("edit");
    let _ = std::fs::remove_file(&path);

    let holder = holder(&storefront, &path);
    holder.init().await;
    holder
        .add_item(VariantId::new("gid://shopify/ProductVariant/11"), None)
        .await;
    holder
        .add_item(VariantId::new("gid://shopify/ProductVariant/21"), Some(3))
        .await;

    let cart = holder.cart().await.unwrap();
    assert_eq!(cart.total_quantity, 4);
    assert_eq!(cart.cost.subtotal_amount.format(), "$68.50");
    let tee_line = cart.lines[0].id.clone();
    let mug_line = cart.lines[1].id.clone();

    holder.update_item(tee_line, 0).await;
    let cart = holder.cart().await.unwrap();
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].id, mug_line);

    holder.remove_item(mug_line).await;
    let state = holder.state().await;
    assert!(state.cart.unwrap().is_empty());
    assert!(!state.is_loading);

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_failed_add_leaves_cart_untouched() {
    let shopify = FakeShopify::spawn().await;
    let storefront = spawn_storefront(&shopify, public_token()).await;
    let path = state_file("failed-add");
    let _ = std::fs::remove_file(&path);

    let holder = holder(&storefront, &path);
    holder.init().await;
    let before = holder.cart().await;

    holder
        .add_item(VariantId::new("gid://shopify/ProductVariant/999"), None)
        .await;

    let state = holder.state().await;
    assert_eq!(state.cart, before);
    assert!(!state.is_open);
    assert!(!state.is_loading);

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_storefront_down_leaves_holder_empty() {
    let path = state_file("down");
    let _ = std::fs::remove_file(&path);
    FileCartIdStore::new(&path)
        .save(&CartId::new("gid://shopify/Cart/old"))
        .unwrap();

    let holder = CartHolder::new(
        CartApi::new("http://127.0.0.1:1").unwrap(),
        FileCartIdStore::new(&path),
    );
    holder.init().await;

    assert!(holder.cart().await.is_none());
    holder
        .add_item(VariantId::new("gid://shopify/ProductVariant/11"), None)
        .await;
    assert!(!holder.state().await.is_loading);

    std::fs::remove_file(&path).unwrap();
}
