//! Delivery agent dashboard.

use greencart_core::{DeliveryConfirmation, OrderId};
use tokio::sync::watch;
use tracing::{info, instrument};

use super::{Resource, Scope, require_user};
use crate::api::ApiClient;
use crate::cancel::CancelToken;
use crate::error::ApiError;
use crate::types::{Assignment, AssignmentCount, DeliveryDashboard, MonthlyEarning, Outcome};

/// Delivery agent state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryState {
    pub dashboard: Resource<DeliveryDashboard>,
    pub monthly_earnings: Resource<Vec<MonthlyEarning>>,
    pub assignment_count: Resource<AssignmentCount>,
}

/// Delivery agent hook for the signed-in agent.
pub struct DeliveryAgentHook {
    scope: Scope<DeliveryState>,
}

impl DeliveryAgentHook {
    /// Create the hook and load the dashboard, earnings and counts.
    pub async fn mount(api: &ApiClient) -> Self {
        let hook = Self {
            scope: Scope::new(
                api,
                DeliveryState {
                    dashboard: Resource::pending(),
                    monthly_earnings: Resource::pending(),
                    assignment_count: Resource::pending(),
                },
            ),
        };
        hook.refresh().await;
        hook
    }

    #[must_use]
    pub fn state(&self) -> DeliveryState {
        self.scope.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DeliveryState> {
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
            self.refresh_dashboard(),
            self.load_earnings(None),
            self.scope.load(|s| &mut s.assignment_count, async {
                api.assignment_count(require_user(api)?, None).await
            }),
        );
    }

    async fn refresh_dashboard(&self) {
        let api = self.scope.api();
        self.scope
            .load(|s| &mut s.dashboard, async {
                api.delivery_dashboard(require_user(api)?).await
            })
            .await;
    }

    /// Load monthly earnings for `year`, or the current year.
    #[instrument(skip(self))]
    pub async fn load_earnings(&self, year: Option<i32>) {
        let api = self.scope.api();
        self.scope
            .load(|s| &mut s.monthly_earnings, async {
                api.monthly_earnings(require_user(api)?, year).await
            })
            .await;
    }

    /// Record the outcome of a delivery, then re-fetch the dashboard.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    #[instrument(skip(self, notes))]
    pub async fn confirm_delivery(
        &self,
        order_id: OrderId,
        notes: &str,
        kind: DeliveryConfirmation,
    ) -> Result<Outcome, ApiError> {
        let api = self.scope.api();
        let outcome = api
            .agent_confirm_delivery(require_user(api)?, order_id, notes, kind)
            .await?;
        info!(%order_id, %kind, "Delivery confirmed");
        self.refresh_dashboard().await;
        Ok(outcome)
    }

    /// Move an assignment to a new status, then re-fetch the dashboard.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    #[instrument(skip(self, notes))]
    pub async fn update_status(
        &self,
        order_id: OrderId,
        status: &str,
        notes: &str,
    ) -> Result<Outcome, ApiError> {
        let api = self.scope.api();
        let outcome = api
            .update_delivery_status(require_user(api)?, order_id, status, notes)
            .await?;
        self.refresh_dashboard().await;
        Ok(outcome)
    }

    /// Mark an assignment delivered, then re-fetch the dashboard.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    #[instrument(skip(self, notes))]
    pub async fn mark_delivered(&self, order_id: OrderId, notes: &str) -> Result<Outcome, ApiError> {
        let api = self.scope.api();
        let outcome = api
            .mark_delivered(require_user(api)?, order_id, notes)
            .await?;
        self.refresh_dashboard().await;
        Ok(outcome)
    }

    /// Every order assigned to the agent.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    pub async fn assigned_orders(&self) -> Result<Vec<Assignment>, ApiError> {
        let api = self.scope.api();
        api.agent_orders(require_user(api)?).await
    }

    /// Assignments not yet delivered.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    pub async fn pending_orders(&self) -> Result<Vec<Assignment>, ApiError> {
        let api = self.scope.api();
        api.agent_pending_orders(require_user(api)?).await
    }

    /// Delivered assignments.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    pub async fn completed_orders(&self) -> Result<Vec<Assignment>, ApiError> {
        let api = self.scope.api();
        api.agent_completed_orders(require_user(api)?).await
    }
}
