//! Cart endpoints.

use greencart_core::{CartItemId, UserId};
use serde::Deserialize;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{AddToCartRequest, CartItem, CartItemRef, CartQuantity, Outcome};
use crate::types::de;

#[derive(Deserialize)]
struct CartResponse {
    #[serde(default, deserialize_with = "de::null_default")]
    cart_items: Vec<CartItem>,
}

impl ApiClient {
    /// The user's cart. A body without `cart_items` is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn cart(&self, user_id: UserId) -> Result<Vec<CartItem>, ApiError> {
        let response: CartResponse = self.get(&format!("cart/{user_id}/")).await?;
        Ok(response.cart_items)
    }

    /// Add a plant to the cart by size name.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if the size is unknown or stock is
    /// insufficient.
    #[instrument(skip(self), fields(plant_id = %request.plant_id, quantity = request.quantity))]
    pub async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<Outcome, ApiError> {
        self.post("cart/add/", request).await
    }

    /// Flip the checkout selection of a cart line.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn toggle_cart_item(
        &self,
        user_id: UserId,
        cart_id: CartItemId,
    ) -> Result<Outcome, ApiError> {
        self.post("cart/toggle/", &CartItemRef { cart_id, user_id })
            .await
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn update_cart_quantity(
        &self,
        user_id: UserId,
        cart_id: CartItemId,
        quantity: u32,
    ) -> Result<Outcome, ApiError> {
        self.post(
            "cart/update_quantity/",
            &CartQuantity {
                cart_id,
                user_id,
                quantity,
            },
        )
        .await
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn remove_cart_item(
        &self,
        user_id: UserId,
        cart_id: CartItemId,
    ) -> Result<Outcome, ApiError> {
        self.post("cart/delete/", &CartItemRef { cart_id, user_id })
            .await
    }
}
