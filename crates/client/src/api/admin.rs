//! Admin dashboard endpoints.

use greencart_core::{OrderId, Role, UserId};
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, Payload};
use crate::error::ApiError;
use crate::types::{
    ActivityEntry, ActivityQuery, AdminOrder, AdminStats, AgentPerformance, AvailableAgent,
    Discount, DiscountRequest, DiscountType, LowStockAlert, LowStockDetail, OrderDetail,
    OrderOverview, Outcome, UserListEntry, UserListShape,
};

#[derive(Serialize)]
struct AssignAgent {
    order_id: OrderId,
    agent_id: UserId,
}

#[derive(Serialize)]
struct AlertFilter {
    resolved: bool,
}

#[derive(Serialize)]
struct DeleteCustomer {
    customer_id: UserId,
}

impl ApiClient {
    /// Headline numbers.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        let response: Payload<AdminStats> = self.get("admin_dashboard/stats/").await?;
        Ok(response.into_inner())
    }

    /// Users holding `role`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(role = %role))]
    pub async fn user_list(&self, role: Role) -> Result<Vec<UserListEntry>, ApiError> {
        let response: Payload<UserListShape> = self
            .get(&format!(
                "admin_dashboard/user-list/{}/",
                role.user_list_segment()
            ))
            .await?;
        Ok(response.into_inner().into())
    }

    /// Every order with its assignment.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<AdminOrder>, ApiError> {
        let response: Payload<Vec<AdminOrder>> = self.get("admin_dashboard/all-orders/").await?;
        Ok(response.into_inner())
    }

    /// One order as the admin sees it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the order does not exist.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn admin_order_details(&self, order_id: OrderId) -> Result<OrderDetail, ApiError> {
        let response: Payload<OrderDetail> = self
            .get(&format!("admin_dashboard/order-details/{order_id}/"))
            .await?;
        Ok(response.into_inner())
    }

    /// Order counts per status.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn order_overview(&self) -> Result<Vec<OrderOverview>, ApiError> {
        let response: Payload<Vec<OrderOverview>> =
            self.get("admin_dashboard/order-overview/").await?;
        Ok(response.into_inner())
    }

    /// Low-stock alerts, resolved or open.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn low_stock_alerts(&self, resolved: bool) -> Result<Vec<LowStockAlert>, ApiError> {
        let response: Payload<Vec<LowStockAlert>> = self
            .post("admin_dashboard/low-stock-alerts/", &AlertFilter { resolved })
            .await?;
        Ok(response.into_inner())
    }

    /// Plants below their stock threshold.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn low_stock_details(&self) -> Result<Vec<LowStockDetail>, ApiError> {
        let response: Payload<Vec<LowStockDetail>> =
            self.get("admin_dashboard/low-stock-details/").await?;
        Ok(response.into_inner())
    }

    /// Delivery numbers per agent.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn agent_performance(&self) -> Result<Vec<AgentPerformance>, ApiError> {
        let response: Payload<Vec<AgentPerformance>> = self
            .get("admin_dashboard/delivery-agent-performance/")
            .await?;
        Ok(response.into_inner())
    }

    /// Agents that can take an assignment.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn available_agents(&self) -> Result<Vec<AvailableAgent>, ApiError> {
        let response: Payload<Vec<AvailableAgent>> = self
            .get("admin_dashboard/available-delivery-agents/")
            .await?;
        Ok(response.into_inner())
    }

    /// Assign an order to a delivery agent.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(order_id = %order_id, agent_id = %agent_id))]
    pub async fn assign_delivery_agent(
        &self,
        order_id: OrderId,
        agent_id: UserId,
    ) -> Result<Outcome, ApiError> {
        self.post(
            "admin_dashboard/assign-delivery-agent/",
            &AssignAgent { order_id, agent_id },
        )
        .await
    }

    /// Discount types the admin can choose from.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn discount_types(&self) -> Result<Vec<DiscountType>, ApiError> {
        let response: Payload<Vec<DiscountType>> =
            self.get("admin_dashboard/discount-types/").await?;
        Ok(response.into_inner())
    }

    /// Every discount ever configured.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_discounts(&self) -> Result<Vec<Discount>, ApiError> {
        let response: Payload<Vec<Discount>> = self.get("admin_dashboard/all-discounts/").await?;
        Ok(response.into_inner())
    }

    /// Discounts currently in effect.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn active_discounts(&self) -> Result<Vec<Discount>, ApiError> {
        let response: Payload<Vec<Discount>> =
            self.get("admin_dashboard/active-discounts/").await?;
        Ok(response.into_inner())
    }

    /// Apply a discount to a category or a single plant.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, request), fields(discount_type_id = %request.discount_type_id))]
    pub async fn apply_discount(&self, request: &DiscountRequest) -> Result<Outcome, ApiError> {
        self.post("admin_dashboard/apply-discount/", request).await
    }

    /// Admin activity log, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn activity_log(&self, query: &ActivityQuery) -> Result<Vec<ActivityEntry>, ApiError> {
        let response: Payload<Vec<ActivityEntry>> =
            self.post("admin_dashboard/activity-log/", query).await?;
        Ok(response.into_inner())
    }

    /// Delete a customer account.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn delete_customer(&self, customer_id: UserId) -> Result<Outcome, ApiError> {
        self.post(
            "admin_dashboard/delete-customer/",
            &DeleteCustomer { customer_id },
        )
        .await
    }
}
