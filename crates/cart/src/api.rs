//! HTTP client for the storefront's same-origin cart proxy.

use harbor_core::{Cart, CartId, CartLineId, VariantId};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use crate::error::{CartClientError, ClientResult};

#[derive(Debug, Deserialize)]
struct CartEnvelope {
    cart: Option<Cart>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddBody<'a> {
    cart_id: &'a CartId,
    variant_id: &'a VariantId,
    quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody<'a> {
    cart_id: &'a CartId,
    line_id: &'a CartLineId,
    quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveBody<'a> {
    cart_id: &'a CartId,
    line_id: &'a CartLineId,
}

/// Client for `/api/cart*` on a running storefront.
#[derive(Debug, Clone)]
pub struct CartApi {
    client: Client,
    base_url: Url,
}

impl CartApi {
    /// Create a client rooted at `base_url` (e.g. `http://127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last path segment unless it ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: Client::builder().build()?,
            base_url,
        })
    }

    /// `GET /api/cart?cartId=...`; `None` when the platform has no such cart.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    pub async fn get(&self, cart_id: &CartId) -> ClientResult<Option<Cart>> {
        let mut url = self.url("api/cart")?;
        url.query_pairs_mut().append_pair("cartId", cart_id.as_str());

        let response = self.client.get(url).send().await?;
        Ok(Self::handle_response::<CartEnvelope>(response).await?.cart)
    }

    /// `POST /api/cart`
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx response, or a
    /// success body without a cart.
    pub async fn create(&self) -> ClientResult<Cart> {
        let response = self.client.post(self.url("api/cart")?).send().await?;
        Self::expect_cart(response).await
    }

    /// `POST /api/cart/add`
    ///
    /// # Errors
    ///
    /// See [`CartApi::create`].
    pub async fn add(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: u32,
    ) -> ClientResult<Cart> {
        let body = AddBody {
            cart_id,
            variant_id,
            quantity,
        };
        self.post("api/cart/add", &body).await
    }

    /// `POST /api/cart/update`; quantity 0 removes the line.
    ///
    /// # Errors
    ///
    /// See [`CartApi::create`].
    pub async fn update(
        &self,
        cart_id: &CartId,
        line_id: &CartLineId,
        quantity: u32,
    ) -> ClientResult<Cart> {
        let body = UpdateBody {
            cart_id,
            line_id,
            quantity,
        };
        self.post("api/cart/update", &body).await
    }

    /// `POST /api/cart/remove`
    ///
    /// # Errors
    ///
    /// See [`CartApi::create`].
    pub async fn remove(&self, cart_id: &CartId, line_id: &CartLineId) -> ClientResult<Cart> {
        let body = RemoveBody { cart_id, line_id };
        self.post("api/cart/remove", &body).await
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<Cart> {
        let response = self.client.post(self.url(path)?).json(body).send().await?;
        Self::expect_cart(response).await
    }

    async fn expect_cart(response: reqwest::Response) -> ClientResult<Cart> {
        Self::handle_response::<CartEnvelope>(response)
            .await?
            .cart
            .ok_or_else(|| CartClientError::InvalidResponse("Missing cart".to_string()))
    }

    /// Map non-2xx to an error carrying the proxy's `{"error": ...}` message.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes).map_or_else(
                |_| String::from_utf8_lossy(&bytes).into_owned(),
                |body| body.error,
            );
            let status = status.as_u16();
            return Err(if (400..500).contains(&status) {
                CartClientError::Rejected { status, message }
            } else {
                CartClientError::Server { status, message }
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| CartClientError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let api = CartApi::new("http://127.0.0.1:3000/shop").unwrap();
        assert_eq!(
            api.url("api/cart").unwrap().as_str(),
            "http://127.0.0.1:3000/shop/api/cart"
        );

        let api = CartApi::new("http://127.0.0.1:3000").unwrap();
        assert_eq!(
            api.url("api/cart/add").unwrap().as_str(),
            "http://127.0.0.1:3000/api/cart/add"
        );
    }

    #[test]
    fn test_rejects_relative_base_url() {
        assert!(matches!(
            CartApi::new("/api"),
            Err(CartClientError::Url(_))
        ));
    }

    #[test]
    fn test_request_bodies_are_camel_case() {
        let cart_id = CartId::new("c1");
        let line_id = CartLineId::new("l1");
        let body = serde_json::to_value(UpdateBody {
            cart_id: &cart_id,
            line_id: &line_id,
            quantity: 0,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "cartId": "c1", "lineId": "l1", "quantity": 0 })
        );
    }
}
