//! Shopping cart of the signed-in user.

use greencart_core::{CartItemId, Money};
use tokio::sync::watch;
use tracing::instrument;

use super::{Resource, Scope, require_user};
use crate::api::ApiClient;
use crate::cancel::CancelToken;
use crate::error::ApiError;
use crate::forms::AddToCartForm;
use crate::types::{self, CartItem, Outcome};

/// Cart state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    pub cart_items: Resource<Vec<CartItem>>,
}

impl CartState {
    /// Lines selected for checkout.
    #[must_use]
    pub fn selected_items(&self) -> Vec<&CartItem> {
        types::selected_items(&self.cart_items.data)
    }

    /// Sum of the selected lines.
    #[must_use]
    pub fn selected_subtotal(&self) -> Money {
        types::selected_subtotal(&self.cart_items.data)
    }
}

/// Cart hook.
pub struct CartHook {
    scope: Scope<CartState>,
}

impl CartHook {
    /// Create the hook and load the cart.
    pub async fn mount(api: &ApiClient) -> Self {
        let hook = Self {
            scope: Scope::new(
                api,
                CartState {
                    cart_items: Resource::pending(),
                },
            ),
        };
        hook.refresh().await;
        hook
    }

    #[must_use]
    pub fn state(&self) -> CartState {
        self.scope.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.scope.subscribe()
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancelToken {
        self.scope.cancel_token()
    }

    /// Re-fetch the cart.
    ///
    /// An anonymous session has an empty cart and makes no request. A
    /// failed fetch also leaves the cart empty, with the error recorded.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let api = self.scope.api();
        match api.session().user_id() {
            Some(user_id) => {
                self.scope
                    .load_or_clear(|s| &mut s.cart_items, api.cart(user_id))
                    .await;
            }
            None => self.scope.modify(|s| {
                s.cart_items = Resource::default();
            }),
        }
    }

    /// Add a plant by size name, then re-fetch.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the form is invalid or nobody is
    /// signed in, otherwise the API error.
    #[instrument(skip(self, form), fields(plant_id = %form.plant_id))]
    pub async fn add_to_cart(&self, form: &AddToCartForm) -> Result<Outcome, ApiError> {
        let user_id = require_user(self.scope.api())?;
        let request = form.validate(user_id)?;
        let outcome = self.scope.api().add_to_cart(&request).await?;
        self.refresh().await;
        Ok(outcome)
    }

    /// Flip a line's checkout selection, then re-fetch.
    ///
    /// # Errors
    ///
    /// Returns the API error; the cart is not re-fetched on failure.
    #[instrument(skip(self))]
    pub async fn toggle_item(&self, cart_id: CartItemId) -> Result<Outcome, ApiError> {
        let user_id = require_user(self.scope.api())?;
        let outcome = self.scope.api().toggle_cart_item(user_id, cart_id).await?;
        self.refresh().await;
        Ok(outcome)
    }

    /// Change a line's quantity, then re-fetch.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a zero quantity, otherwise the
    /// API error.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        cart_id: CartItemId,
        quantity: u32,
    ) -> Result<Outcome, ApiError> {
        if quantity < 1 {
            return Err(crate::forms::FormError::InvalidQuantity.into());
        }
        let user_id = require_user(self.scope.api())?;
        let outcome = self
            .scope
            .api()
            .update_cart_quantity(user_id, cart_id, quantity)
            .await?;
        self.refresh().await;
        Ok(outcome)
    }

    /// Remove a line, then re-fetch.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    #[instrument(skip(self))]
    pub async fn remove(&self, cart_id: CartItemId) -> Result<Outcome, ApiError> {
        let user_id = require_user(self.scope.api())?;
        let outcome = self.scope.api().remove_cart_item(user_id, cart_id).await?;
        self.refresh().await;
        Ok(outcome)
    }

    /// Lines selected for checkout.
    #[must_use]
    pub fn selected_items(&self) -> Vec<CartItem> {
        self.state().selected_items().into_iter().cloned().collect()
    }

    /// Sum of the selected lines.
    #[must_use]
    pub fn selected_subtotal(&self) -> Money {
        self.state().selected_subtotal()
    }
}
