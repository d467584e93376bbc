//! Admin dashboard.

use greencart_core::{OrderId, Role, UserId};
use tokio::sync::watch;
use tracing::{info, instrument};

use super::{Resource, Scope};
use crate::api::ApiClient;
use crate::cancel::CancelToken;
use crate::error::ApiError;
use crate::forms::DiscountForm;
use crate::types::{
    ActivityEntry, ActivityQuery, AdminOrder, AdminStats, AgentPerformance, AvailableAgent,
    Discount, DiscountType, LowStockAlert, LowStockDetail, OrderDetail, OrderOverview, Outcome,
    UserListEntry,
};

/// Admin dashboard state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminState {
    pub stats: Resource<AdminStats>,
    pub customers: Resource<Vec<UserListEntry>>,
    pub delivery_agents: Resource<Vec<UserListEntry>>,
    pub sellers: Resource<Vec<UserListEntry>>,
    pub orders: Resource<Vec<AdminOrder>>,
    /// Open low-stock alerts.
    pub low_stock_alerts: Resource<Vec<LowStockAlert>>,
}

/// Admin dashboard hook.
pub struct AdminDashboardHook {
    scope: Scope<AdminState>,
}

impl AdminDashboardHook {
    /// Create the hook and load the dashboard.
    pub async fn mount(api: &ApiClient) -> Self {
        let hook = Self {
            scope: Scope::new(
                api,
                AdminState {
                    stats: Resource::pending(),
                    customers: Resource::pending(),
                    delivery_agents: Resource::pending(),
                    sellers: Resource::pending(),
                    orders: Resource::pending(),
                    low_stock_alerts: Resource::pending(),
                },
            ),
        };
        hook.refresh().await;
        hook
    }

    #[must_use]
    pub fn state(&self) -> AdminState {
        self.scope.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AdminState> {
        self.scope.subscribe()
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancelToken {
        self.scope.cancel_token()
    }

    /// Re-fetch every slice concurrently.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let api = self.scope.api();
        tokio::join!(
            self.scope.load(|s| &mut s.stats, api.admin_stats()),
            self.refresh_customers(),
            self.scope.load(
                |s| &mut s.delivery_agents,
                api.user_list(Role::DeliveryAgent)
            ),
            self.scope
                .load(|s| &mut s.sellers, api.user_list(Role::Seller)),
            self.refresh_orders(),
            self.refresh_alerts(),
        );
    }

    async fn refresh_customers(&self) {
        let api = self.scope.api();
        self.scope
            .load(|s| &mut s.customers, api.user_list(Role::Customer))
            .await;
    }

    async fn refresh_orders(&self) {
        let api = self.scope.api();
        self.scope.load(|s| &mut s.orders, api.all_orders()).await;
    }

    async fn refresh_alerts(&self) {
        let api = self.scope.api();
        self.scope
            .load(|s| &mut s.low_stock_alerts, api.low_stock_alerts(false))
            .await;
    }

    /// Assign an order to an agent, then re-fetch orders.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    #[instrument(skip(self))]
    pub async fn assign_delivery_agent(
        &self,
        order_id: OrderId,
        agent_id: UserId,
    ) -> Result<Outcome, ApiError> {
        let outcome = self
            .scope
            .api()
            .assign_delivery_agent(order_id, agent_id)
            .await?;
        info!(%order_id, %agent_id, "Delivery agent assigned");
        self.refresh_orders().await;
        Ok(outcome)
    }

    /// Apply a discount, then re-fetch low-stock alerts.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid form, otherwise the API
    /// error.
    #[instrument(skip_all)]
    pub async fn apply_discount(&self, form: &DiscountForm) -> Result<Outcome, ApiError> {
        let request = form.validate()?;
        let outcome = self.scope.api().apply_discount(&request).await?;
        self.refresh_alerts().await;
        Ok(outcome)
    }

    /// Delete a customer, then re-fetch customers.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, customer_id: UserId) -> Result<Outcome, ApiError> {
        let outcome = self.scope.api().delete_customer(customer_id).await?;
        info!(%customer_id, "Customer deleted");
        self.refresh_customers().await;
        Ok(outcome)
    }

    // Lookups used by the orders, sales, reports and delivery pages.

    /// # Errors
    ///
    /// Returns the API error.
    pub async fn order_details(&self, order_id: OrderId) -> Result<OrderDetail, ApiError> {
        self.scope.api().admin_order_details(order_id).await
    }

    /// # Errors
    ///
    /// Returns the API error.
    pub async fn order_overview(&self) -> Result<Vec<OrderOverview>, ApiError> {
        self.scope.api().order_overview().await
    }

    /// # Errors
    ///
    /// Returns the API error.
    pub async fn agent_performance(&self) -> Result<Vec<AgentPerformance>, ApiError> {
        self.scope.api().agent_performance().await
    }

    /// # Errors
    ///
    /// Returns the API error.
    pub async fn available_agents(&self) -> Result<Vec<AvailableAgent>, ApiError> {
        self.scope.api().available_agents().await
    }

    /// # Errors
    ///
    /// Returns the API error.
    pub async fn low_stock_details(&self) -> Result<Vec<LowStockDetail>, ApiError> {
        self.scope.api().low_stock_details().await
    }

    /// # Errors
    ///
    /// Returns the API error.
    pub async fn resolved_alerts(&self) -> Result<Vec<LowStockAlert>, ApiError> {
        self.scope.api().low_stock_alerts(true).await
    }

    /// # Errors
    ///
    /// Returns the API error.
    pub async fn discount_types(&self) -> Result<Vec<DiscountType>, ApiError> {
        self.scope.api().discount_types().await
    }

    /// Every discount, or only those in effect.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    pub async fn discounts(&self, active_only: bool) -> Result<Vec<Discount>, ApiError> {
        if active_only {
            self.scope.api().active_discounts().await
        } else {
            self.scope.api().all_discounts().await
        }
    }

    /// # Errors
    ///
    /// Returns the API error.
    pub async fn activity_log(&self, query: &ActivityQuery) -> Result<Vec<ActivityEntry>, ApiError> {
        self.scope.api().activity_log(query).await
    }
}
