//! Same-origin cart proxy.
//!
//! Browsers never see the Storefront API token; they call these endpoints
//! and the server forwards to Shopify. Each endpoint checks its required
//! fields, makes exactly one upstream call, and answers `{"cart": ...}` on
//! success or `{"error": ...}` on failure. Empty strings count as missing.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
};
use harbor_core::{Cart, CartId, CartLineId, CartLineInput, CartLineUpdateInput, VariantId};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::error::{AppError, Result, UpstreamContext, add_breadcrumb};
use crate::state::AppState;

const INVALID_BODY: &str = "Invalid request body";

/// Query string for `GET /api/cart`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuery {
    pub cart_id: Option<String>,
}

/// Body for `POST /api/cart/add`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub cart_id: Option<String>,
    pub variant_id: Option<String>,
    /// Defaults to 1.
    pub quantity: Option<u32>,
}

/// Body for `POST /api/cart/update`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub cart_id: Option<String>,
    pub line_id: Option<String>,
    /// Zero is valid and removes the line.
    pub quantity: Option<u32>,
}

/// Body for `POST /api/cart/remove`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub cart_id: Option<String>,
    pub line_id: Option<String>,
}

/// Success envelope for every cart endpoint.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Option<Cart>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parse a JSON body whatever its `Content-Type` says.
fn json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "Rejected cart request body");
        AppError::BadRequest(INVALID_BODY.to_string())
    })
}

fn bad_request(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

/// `GET /api/cart?cartId=...`
#[instrument(skip(state, query))]
pub async fn show(
    State(state): State<AppState>,
    query: std::result::Result<Query<CartQuery>, QueryRejection>,
) -> Result<Json<CartResponse>> {
    const REQUIRED: &str = "Cart ID required";

    let Ok(Query(query)) = query else {
        return Err(bad_request(REQUIRED));
    };
    let cart_id = present(query.cart_id).ok_or_else(|| bad_request(REQUIRED))?;

    let cart = state
        .storefront()
        .get_cart(&CartId::new(cart_id))
        .await
        .upstream("Failed to fetch cart")?;

    Ok(Json(CartResponse { cart }))
}

/// `POST /api/cart`
#[instrument(skip(state))]
pub async fn create(State(state): State<AppState>) -> Result<Json<CartResponse>> {
    let cart = state
        .storefront()
        .create_cart()
        .await
        .upstream("Failed to create cart")?;

    add_breadcrumb("cart", "Created cart", Some(&[("cart_id", cart.id.as_str())]));

    Ok(Json(CartResponse { cart: Some(cart) }))
}

/// `POST /api/cart/add`
#[instrument(skip(state, payload))]
pub async fn add(
    State(state): State<AppState>,
    payload: Bytes,
) -> Result<Json<CartResponse>> {
    let body: AddToCartRequest = json_body(&payload)?;
    let (Some(cart_id), Some(variant_id)) = (present(body.cart_id), present(body.variant_id))
    else {
        return Err(bad_request("Cart ID and Variant ID required"));
    };
    let quantity = body.quantity.unwrap_or(1);

    add_breadcrumb(
        "cart",
        "Add to cart",
        Some(&[("variant_id", variant_id.as_str())]),
    );

    let cart = state
        .storefront()
        .add_to_cart(
            &CartId::new(cart_id),
            vec![CartLineInput {
                merchandise_id: VariantId::new(variant_id),
                quantity,
            }],
        )
        .await
        .upstream("Failed to add to cart")?;

    Ok(Json(CartResponse { cart: Some(cart) }))
}

/// `POST /api/cart/update`
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    payload: Bytes,
) -> Result<Json<CartResponse>> {
    let body: UpdateCartRequest = json_body(&payload)?;
    let (Some(cart_id), Some(line_id), Some(quantity)) =
        (present(body.cart_id), present(body.line_id), body.quantity)
    else {
        return Err(bad_request("Cart ID, Line ID, and quantity required"));
    };

    add_breadcrumb("cart", "Update cart line", Some(&[("line_id", line_id.as_str())]));

    let cart = state
        .storefront()
        .update_cart(
            &CartId::new(cart_id),
            vec![CartLineUpdateInput {
                id: CartLineId::new(line_id),
                quantity,
            }],
        )
        .await
        .upstream("Failed to update cart")?;

    Ok(Json(CartResponse { cart: Some(cart) }))
}

/// `POST /api/cart/remove`
#[instrument(skip(state, payload))]
pub async fn remove(
    State(state): State<AppState>,
    payload: Bytes,
) -> Result<Json<CartResponse>> {
    let body: RemoveFromCartRequest = json_body(&payload)?;
    let (Some(cart_id), Some(line_id)) = (present(body.cart_id), present(body.line_id)) else {
        return Err(bad_request("Cart ID and Line ID required"));
    };

    add_breadcrumb("cart", "Remove cart line", Some(&[("line_id", line_id.as_str())]));

    let cart = state
        .storefront()
        .remove_from_cart(&CartId::new(cart_id), vec![CartLineId::new(line_id)])
        .await
        .upstream("Failed to remove from cart")?;

    Ok(Json(CartResponse { cart: Some(cart) }))
}
