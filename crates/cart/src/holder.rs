//! Session cart state.
//!
//! One [`CartHolder`] per session owns the current cart, a loading flag and
//! the drawer-open flag. Mutations go through the cart proxy and replace the
//! whole cart with the server's answer; failures are logged and leave the
//! state as it was.
//!
//! Operations are not serialized against each other. Concurrent calls race,
//! the last response to arrive wins, and the first call to finish clears the
//! loading flag. Locks are never held across a network call.

use std::sync::Arc;

use harbor_core::{Cart, CartId, CartLineId, VariantId};
use tokio::sync::RwLock;
use tracing::{debug, error, instrument, warn};

use crate::api::CartApi;
use crate::error::ClientResult;
use crate::store::CartIdStore;

/// Snapshot of a session's cart state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    pub cart: Option<Cart>,
    pub is_loading: bool,
    pub is_open: bool,
}

/// Client-side holder of the session's cart.
pub struct CartHolder<S> {
    api: CartApi,
    store: Arc<S>,
    state: Arc<RwLock<CartState>>,
}

impl<S> Clone for CartHolder<S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            store: Arc::clone(&self.store),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: CartIdStore> CartHolder<S> {
    #[must_use]
    pub fn new(api: CartApi, store: S) -> Self {
        Self {
            api,
            store: Arc::new(store),
            state: Arc::new(RwLock::new(CartState::default())),
        }
    }

    /// Copy of the current state.
    pub async fn state(&self) -> CartState {
        self.state.read().await.clone()
    }

    pub async fn cart(&self) -> Option<Cart> {
        self.state.read().await.cart.clone()
    }

    pub async fn open(&self) {
        self.state.write().await.is_open = true;
    }

    pub async fn close(&self) {
        self.state.write().await.is_open = false;
    }

    /// Restore the persisted cart, or create a new one.
    ///
    /// A stored ID that fails to load (transport error, non-2xx, or a cart
    /// the platform no longer has) falls through to creation. If creation
    /// fails too the holder stays without a cart.
    #[instrument(skip(self))]
    pub async fn init(&self) {
        let stored = match self.store.load() {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Could not read stored cart ID");
                None
            }
        };

        if let Some(cart_id) = stored {
            match self.api.get(&cart_id).await {
                Ok(Some(cart)) => {
                    debug!(cart_id = %cart.id, "Restored stored cart");
                    self.state.write().await.cart = Some(cart);
                    return;
                }
                Ok(None) => debug!(cart_id = %cart_id, "Stored cart no longer exists"),
                Err(e) => warn!(cart_id = %cart_id, error = %e, "Failed to fetch stored cart"),
            }
        }

        match self.api.create().await {
            Ok(cart) => {
                if let Err(e) = self.store.save(&cart.id) {
                    warn!(error = %e, "Could not persist cart ID");
                }
                debug!(cart_id = %cart.id, "Created cart");
                self.state.write().await.cart = Some(cart);
            }
            Err(e) => error!(error = %e, "Failed to create cart"),
        }
    }

    /// Add `quantity` (default 1) of a variant and open the drawer.
    #[instrument(skip(self))]
    pub async fn add_item(&self, variant_id: VariantId, quantity: Option<u32>) {
        let quantity = quantity.unwrap_or(1);
        let api = &self.api;
        self.mutate("add", true, |cart_id| async move {
            api.add(&cart_id, &variant_id, quantity).await
        })
        .await;
    }

    /// Set a line's quantity; 0 removes it.
    #[instrument(skip(self))]
    pub async fn update_item(&self, line_id: CartLineId, quantity: u32) {
        let api = &self.api;
        self.mutate("update", false, |cart_id| async move {
            api.update(&cart_id, &line_id, quantity).await
        })
        .await;
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, line_id: CartLineId) {
        let api = &self.api;
        self.mutate("remove", false, |cart_id| async move {
            api.remove(&cart_id, &line_id).await
        })
        .await;
    }

    async fn mutate<F, Fut>(&self, action: &'static str, open_on_success: bool, call: F)
    where
        F: FnOnce(CartId) -> Fut,
        Fut: Future<Output = ClientResult<Cart>>,
    {
        let cart_id = {
            let mut state = self.state.write().await;
            let Some(cart) = state.cart.as_ref() else {
                debug!(action, "No cart yet, ignoring");
                return;
            };
            let id = cart.id.clone();
            state.is_loading = true;
            id
        };

        let result = call(cart_id).await;

        let mut state = self.state.write().await;
        match result {
            Ok(cart) => {
                state.cart = Some(cart);
                if open_on_success {
                    state.is_open = true;
                }
            }
            Err(e) => error!(action, error = %e, "Cart update failed"),
        }
        state.is_loading = false;
    }
}
