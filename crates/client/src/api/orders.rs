//! Customer order endpoints.

use greencart_core::{OrderId, UserId};
use serde::Deserialize;
use tracing::instrument;

use super::{ApiClient, Payload};
use crate::error::ApiError;
use crate::types::de;
use crate::types::{
    ConfirmReceipt, CreateOrderRequest, CreatedOrder, DeliveryMethod, OrderDetail, OrderReviewRequest,
    OrderStats, OrderSummary, Outcome,
};

#[derive(Deserialize)]
struct OrdersResponse {
    #[serde(default, alias = "data", deserialize_with = "de::null_default")]
    orders: Vec<OrderSummary>,
}

#[derive(Deserialize)]
struct StatsResponse {
    #[serde(default, alias = "data", deserialize_with = "de::null_default")]
    stats: OrderStats,
}

#[derive(Deserialize)]
struct MethodsResponse {
    #[serde(default, alias = "delivery_methods", alias = "data", deserialize_with = "de::null_default")]
    methods: Vec<DeliveryMethod>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OrderEnvelope {
    Keyed {
        #[serde(alias = "data")]
        order: Box<OrderDetail>,
    },
    Bare(Box<OrderDetail>),
}

impl ApiClient {
    /// The customer's orders, optionally filtered by status label.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn customer_orders(
        &self,
        user_id: UserId,
        status: Option<&str>,
    ) -> Result<Vec<OrderSummary>, ApiError> {
        let path = format!("order/orders/{user_id}/");
        let response: OrdersResponse = match status {
            Some(status) => self.get_query(&path, &[("status", status)]).await?,
            None => self.get(&path).await?,
        };
        Ok(response.orders)
    }

    /// Orders the agent marked delivered that the customer has not yet
    /// confirmed.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn pending_confirmation(&self, user_id: UserId) -> Result<Vec<OrderSummary>, ApiError> {
        let response: OrdersResponse = self
            .get(&format!("order/pending-confirmation/{user_id}/"))
            .await?;
        Ok(response.orders)
    }

    /// Delivered orders with their items and review flags.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn completed_for_review(&self, user_id: UserId) -> Result<Vec<OrderSummary>, ApiError> {
        let response: OrdersResponse = self
            .get(&format!("order/completed-for-review/{user_id}/"))
            .await?;
        Ok(response.orders)
    }

    /// Order counters for the customer dashboard.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn order_stats(&self, user_id: UserId) -> Result<OrderStats, ApiError> {
        let response: StatsResponse = self.get(&format!("order/stats/{user_id}/")).await?;
        Ok(response.stats)
    }

    /// One order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the order does not exist.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn order_details(&self, order_id: OrderId) -> Result<OrderDetail, ApiError> {
        let envelope: OrderEnvelope = self
            .get(&format!("order/order-details/{order_id}/"))
            .await?;
        Ok(match envelope {
            OrderEnvelope::Keyed { order } | OrderEnvelope::Bare(order) => *order,
        })
    }

    /// Shipping options offered at checkout.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn delivery_methods(&self) -> Result<Vec<DeliveryMethod>, ApiError> {
        let response: MethodsResponse = self.get("order/delivery-methods/").await?;
        Ok(response.methods)
    }

    /// Confirm receipt of a delivered order.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn confirm_receipt(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Outcome, ApiError> {
        self.post("order/confirm-delivery/", &ConfirmReceipt { order_id, user_id })
            .await
    }

    /// Review a plant from a delivered order.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, review), fields(order_id = %review.order_id, plant_id = %review.plant_id))]
    pub async fn add_order_review(&self, review: &OrderReviewRequest) -> Result<Outcome, ApiError> {
        self.post("order/add-review/", review).await
    }

    /// Place an order for the selected cart lines.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if a line went out of stock.
    #[instrument(skip(self, request), fields(items = request.cart_ids.len()))]
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<CreatedOrder, ApiError> {
        let response: Payload<CreatedOrder> = self.post("order/create-order/", request).await?;
        Ok(response.into_inner())
    }
}
