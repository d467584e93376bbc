//! Customer order dashboard and checkout.

use greencart_core::OrderId;
use tokio::sync::watch;
use tracing::{info, instrument};

use super::{Resource, Scope, require_user};
use crate::api::ApiClient;
use crate::cancel::CancelToken;
use crate::error::ApiError;
use crate::forms::{CheckoutForm, ReviewForm};
use crate::types::{
    CartItem, CreatedOrder, DeliveryMethod, OrderDetail, OrderStats, OrderSummary, Outcome,
};

/// Customer order dashboard state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersState {
    pub all_orders: Resource<Vec<OrderSummary>>,
    pub pending_confirmation: Resource<Vec<OrderSummary>>,
    pub completed_for_review: Resource<Vec<OrderSummary>>,
    pub stats: Resource<OrderStats>,
    pub delivery_methods: Resource<Vec<DeliveryMethod>>,
}

/// Customer order hook.
pub struct CustomerOrdersHook {
    scope: Scope<OrdersState>,
}

impl CustomerOrdersHook {
    /// Create the hook and load every dashboard slice.
    pub async fn mount(api: &ApiClient) -> Self {
        let hook = Self {
            scope: Scope::new(
                api,
                OrdersState {
                    all_orders: Resource::pending(),
                    pending_confirmation: Resource::pending(),
                    completed_for_review: Resource::pending(),
                    stats: Resource::pending(),
                    delivery_methods: Resource::default(),
                },
            ),
        };
        hook.refresh().await;
        hook
    }

    #[must_use]
    pub fn state(&self) -> OrdersState {
        self.scope.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<OrdersState> {
        self.scope.subscribe()
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancelToken {
        self.scope.cancel_token()
    }

    /// Re-fetch all four dashboard slices concurrently.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        tokio::join!(
            self.refresh_all(),
            self.refresh_pending(),
            self.refresh_completed(),
            self.refresh_stats(),
        );
    }

    async fn refresh_all(&self) {
        let api = self.scope.api();
        self.scope
            .load(|s| &mut s.all_orders, async {
                api.customer_orders(require_user(api)?, None).await
            })
            .await;
    }

    async fn refresh_pending(&self) {
        let api = self.scope.api();
        self.scope
            .load(|s| &mut s.pending_confirmation, async {
                api.pending_confirmation(require_user(api)?).await
            })
            .await;
    }

    async fn refresh_completed(&self) {
        let api = self.scope.api();
        self.scope
            .load(|s| &mut s.completed_for_review, async {
                api.completed_for_review(require_user(api)?).await
            })
            .await;
    }

    async fn refresh_stats(&self) {
        let api = self.scope.api();
        self.scope
            .load(|s| &mut s.stats, async {
                api.order_stats(require_user(api)?).await
            })
            .await;
    }

    /// Orders still in progress.
    #[must_use]
    pub fn open_orders(&self) -> Vec<OrderSummary> {
        self.state()
            .all_orders
            .data
            .into_iter()
            .filter(|o| o.order_status.is_open())
            .collect()
    }

    /// Confirm receipt of a delivered order, then re-fetch the pending and
    /// full order lists.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    #[instrument(skip(self))]
    pub async fn confirm_delivery(&self, order_id: OrderId) -> Result<Outcome, ApiError> {
        let api = self.scope.api();
        let outcome = api.confirm_receipt(require_user(api)?, order_id).await?;
        tokio::join!(self.refresh_pending(), self.refresh_all());
        Ok(outcome)
    }

    /// Review a plant from a delivered order, then re-fetch the
    /// completed-for-review list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid rating, otherwise the
    /// API error.
    #[instrument(skip(self, form), fields(order_id = %form.order_id, plant_id = %form.plant_id))]
    pub async fn add_review(&self, form: &ReviewForm) -> Result<Outcome, ApiError> {
        let api = self.scope.api();
        let review = form.validate(require_user(api)?)?;
        let outcome = api.add_order_review(&review).await?;
        self.refresh_completed().await;
        Ok(outcome)
    }

    /// One order with its line items.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    pub async fn order_details(&self, order_id: OrderId) -> Result<OrderDetail, ApiError> {
        self.scope.api().order_details(order_id).await
    }

    /// Load the shipping options offered at checkout.
    #[instrument(skip(self))]
    pub async fn load_delivery_methods(&self) {
        self.scope
            .load(
                |s| &mut s.delivery_methods,
                self.scope.api().delivery_methods(),
            )
            .await;
    }

    /// Place an order for the selected lines of `cart`, then re-fetch the
    /// dashboard.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if nothing is selected or the address
    /// or delivery method is missing, otherwise the API error.
    #[instrument(skip_all)]
    pub async fn place_order(
        &self,
        form: &CheckoutForm,
        cart: &[CartItem],
    ) -> Result<CreatedOrder, ApiError> {
        let api = self.scope.api();
        let request = form.validate(require_user(api)?, cart)?;
        let created = api.create_order(&request).await?;
        info!(order_id = %created.order_id, items = request.cart_ids.len(), "Order placed");
        self.refresh().await;
        Ok(created)
    }
}
