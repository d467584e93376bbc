use greencart_core::{DeliveryConfirmation, Money, OrderId, OrderStatus, UserId};
use serde::{Deserialize, Serialize};

use super::de;

/// Counters on the delivery agent dashboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeliveryStats {
    #[serde(default, deserialize_with = "de::null_default")]
    pub total_assignments: u64,
    #[serde(default, deserialize_with = "de::null_default")]
    pub pending_assignments: u64,
    #[serde(default, deserialize_with = "de::null_default")]
    pub completed_assignments: u64,
    #[serde(default)]
    pub total_earnings: Money,
    /// Average delivery time in hours.
    #[serde(default, deserialize_with = "de::null_default")]
    pub avg_delivery_time: f64,
}

/// An order assigned to the agent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Assignment {
    #[serde(alias = "id")]
    pub order_id: OrderId,
    #[serde(default, deserialize_with = "de::text")]
    pub order_number: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub order_date: Option<String>,
    #[serde(default, alias = "status", alias = "status_name")]
    pub order_status: OrderStatus,
    #[serde(default)]
    pub total_amount: Money,
    #[serde(default)]
    pub customer_id: Option<UserId>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub delivery_method: Option<String>,
    #[serde(default)]
    pub delivery_cost: Option<Money>,
    #[serde(default, alias = "assignment_notes")]
    pub delivery_notes: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub estimated_delivery_date: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub actual_delivery_date: Option<String>,
    #[serde(default)]
    pub delivery_performance: Option<String>,
    #[serde(default, alias = "order_items")]
    pub items_summary: Option<String>,
    #[serde(default)]
    pub primary_image: Option<String>,
}

/// Payload of `delivery_agent/dashboard/:id/`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeliveryDashboard {
    #[serde(default)]
    pub stats: DeliveryStats,
    #[serde(default, deserialize_with = "de::null_default")]
    pub pending_orders: Vec<Assignment>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub completed_orders: Vec<Assignment>,
}

/// Earnings for one month.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonthlyEarning {
    #[serde(default, deserialize_with = "de::text")]
    pub month: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, alias = "deliveries", deserialize_with = "de::null_default")]
    pub delivery_count: u64,
    #[serde(default, alias = "total_earnings")]
    pub earnings: Money,
}

/// Payload of `delivery_agent/assignment-count/:id/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssignmentCount {
    #[serde(default, deserialize_with = "de::null_default")]
    pub assignment_count: u64,
    #[serde(default)]
    pub status_filter: Option<String>,
}

/// Body of `delivery_agent/confirm-delivery/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct AgentConfirmation {
    pub order_id: OrderId,
    pub agent_id: UserId,
    pub notes: String,
    #[serde(rename = "type")]
    pub kind: DeliveryConfirmation,
}

/// Body of `delivery_agent/update-status/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct StatusUpdate {
    pub order_id: OrderId,
    pub agent_id: UserId,
    pub status: String,
    pub notes: String,
}

/// Body of `delivery_agent/mark-delivered/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct MarkDelivered {
    pub order_id: OrderId,
    pub agent_id: UserId,
    pub notes: String,
}
