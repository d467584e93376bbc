//! Delivery agent endpoints.

use greencart_core::{DeliveryConfirmation, OrderId, UserId};
use tracing::instrument;

use super::{ApiClient, Payload};
use crate::error::ApiError;
use crate::types::{
    AgentConfirmation, Assignment, AssignmentCount, DeliveryDashboard, MarkDelivered,
    MonthlyEarning, Outcome, StatusUpdate,
};

impl ApiClient {
    /// Stats plus pending and completed assignments in one call.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(agent_id = %agent_id))]
    pub async fn delivery_dashboard(&self, agent_id: UserId) -> Result<DeliveryDashboard, ApiError> {
        let response: Payload<DeliveryDashboard> = self
            .get(&format!("delivery_agent/dashboard/{agent_id}/"))
            .await?;
        Ok(response.into_inner())
    }

    /// Every order assigned to the agent.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(agent_id = %agent_id))]
    pub async fn agent_orders(&self, agent_id: UserId) -> Result<Vec<Assignment>, ApiError> {
        let response: Payload<Vec<Assignment>> = self
            .get(&format!("delivery_agent/orders/{agent_id}/"))
            .await?;
        Ok(response.into_inner())
    }

    /// Assignments not yet delivered.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(agent_id = %agent_id))]
    pub async fn agent_pending_orders(&self, agent_id: UserId) -> Result<Vec<Assignment>, ApiError> {
        let response: Payload<Vec<Assignment>> = self
            .get(&format!("delivery_agent/pending-orders/{agent_id}/"))
            .await?;
        Ok(response.into_inner())
    }

    /// Delivered assignments.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(agent_id = %agent_id))]
    pub async fn agent_completed_orders(
        &self,
        agent_id: UserId,
    ) -> Result<Vec<Assignment>, ApiError> {
        let response: Payload<Vec<Assignment>> = self
            .get(&format!("delivery_agent/completed-orders/{agent_id}/"))
            .await?;
        Ok(response.into_inner())
    }

    /// Number of assignments, optionally only those with `status`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(agent_id = %agent_id))]
    pub async fn assignment_count(
        &self,
        agent_id: UserId,
        status: Option<&str>,
    ) -> Result<AssignmentCount, ApiError> {
        let path = format!("delivery_agent/assignment-count/{agent_id}/");
        let response: Payload<AssignmentCount> = match status {
            Some(status) => self.get_query(&path, &[("status", status)]).await?,
            None => self.get(&path).await?,
        };
        Ok(response.into_inner())
    }

    /// Earnings per month, for `year` or the current year.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(agent_id = %agent_id))]
    pub async fn monthly_earnings(
        &self,
        agent_id: UserId,
        year: Option<i32>,
    ) -> Result<Vec<MonthlyEarning>, ApiError> {
        let path = format!("delivery_agent/monthly-earnings/{agent_id}/");
        let response: Payload<Vec<MonthlyEarning>> = match year {
            Some(year) => self.get_query(&path, &[("year", year)]).await?,
            None => self.get(&path).await?,
        };
        Ok(response.into_inner())
    }

    /// Move an assignment to a new status.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, notes), fields(order_id = %order_id))]
    pub async fn update_delivery_status(
        &self,
        agent_id: UserId,
        order_id: OrderId,
        status: &str,
        notes: &str,
    ) -> Result<Outcome, ApiError> {
        self.post(
            "delivery_agent/update-status/",
            &StatusUpdate {
                order_id,
                agent_id,
                status: status.to_string(),
                notes: notes.to_string(),
            },
        )
        .await
    }

    /// Record the agent's side of a delivery.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, notes), fields(order_id = %order_id, kind = %kind))]
    pub async fn agent_confirm_delivery(
        &self,
        agent_id: UserId,
        order_id: OrderId,
        notes: &str,
        kind: DeliveryConfirmation,
    ) -> Result<Outcome, ApiError> {
        self.post(
            "delivery_agent/confirm-delivery/",
            &AgentConfirmation {
                order_id,
                agent_id,
                notes: notes.to_string(),
                kind,
            },
        )
        .await
    }

    /// Mark an assignment delivered.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, notes), fields(order_id = %order_id))]
    pub async fn mark_delivered(
        &self,
        agent_id: UserId,
        order_id: OrderId,
        notes: &str,
    ) -> Result<Outcome, ApiError> {
        self.post(
            "delivery_agent/mark-delivered/",
            &MarkDelivered {
                order_id,
                agent_id,
                notes: notes.to_string(),
            },
        )
        .await
    }
}
