use chrono::NaiveDateTime;
use greencart_core::{
    AlertId, CategoryId, DiscountId, DiscountTypeId, Money, OrderId, OrderStatus, PlantId,
    UserId,
};
use serde::{Deserialize, Serialize, Serializer};

use super::de;

/// Wire format of discount dates.
pub const DISCOUNT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Headline numbers on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AdminStats {
    #[serde(default, alias = "totalCustomers", deserialize_with = "de::null_default")]
    pub total_customers: u64,
    #[serde(default, alias = "totalOrders", deserialize_with = "de::null_default")]
    pub total_orders: u64,
    #[serde(
        default,
        alias = "totalSalesReps",
        alias = "total_sellers",
        deserialize_with = "de::null_default"
    )]
    pub total_sales_reps: u64,
    #[serde(
        default,
        alias = "totalDeliveryAgents",
        deserialize_with = "de::null_default"
    )]
    pub total_delivery_agents: u64,
    #[serde(default, alias = "monthlyRevenue")]
    pub monthly_revenue: Money,
    #[serde(
        default,
        alias = "activeDeliveries",
        deserialize_with = "de::null_default"
    )]
    pub active_deliveries: u64,
}

/// A row of `admin_dashboard/user-list/:role/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserListEntry {
    #[serde(alias = "id")]
    pub user_id: UserId,
    #[serde(default, alias = "username", alias = "full_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "order_count", alias = "total_orders")]
    pub orders: Option<u64>,
    #[serde(default, alias = "vehicle_type")]
    pub vehicle: Option<String>,
    #[serde(default, alias = "total_deliveries")]
    pub deliveries: Option<u64>,
    #[serde(default, alias = "total_earnings")]
    pub earnings: Option<Money>,
}

/// User lists arrive either as a bare array or wrapped in `{users: [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum UserListShape {
    Bare(Vec<UserListEntry>),
    Wrapped {
        #[serde(default, deserialize_with = "de::null_default")]
        users: Vec<UserListEntry>,
    },
}

impl From<UserListShape> for Vec<UserListEntry> {
    fn from(shape: UserListShape) -> Self {
        match shape {
            UserListShape::Bare(users) | UserListShape::Wrapped { users } => users,
        }
    }
}

/// An order as seen by the admin, with its delivery assignment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdminOrder {
    #[serde(alias = "id")]
    pub order_id: OrderId,
    #[serde(default, deserialize_with = "de::text")]
    pub order_number: Option<String>,
    #[serde(default, alias = "customer")]
    pub customer_name: Option<String>,
    #[serde(default, alias = "customerEmail")]
    pub customer_email: Option<String>,
    #[serde(default, alias = "customerPhone")]
    pub customer_phone: Option<String>,
    #[serde(default, alias = "date", deserialize_with = "de::text")]
    pub order_date: Option<String>,
    #[serde(default, alias = "amount", alias = "total")]
    pub total_amount: Money,
    #[serde(default, alias = "status", alias = "status_name")]
    pub order_status: OrderStatus,
    #[serde(default, alias = "assignedAgent", alias = "assigned_agent_id")]
    pub agent_id: Option<UserId>,
    #[serde(default, alias = "agentName")]
    pub agent_name: Option<String>,
}

/// Low-stock alerts summary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LowStockAlert {
    #[serde(default, alias = "id")]
    pub alert_id: Option<AlertId>,
    pub plant_id: PlantId,
    #[serde(default, alias = "name", deserialize_with = "de::null_default")]
    pub plant_name: String,
    #[serde(default, alias = "category_name")]
    pub category: Option<String>,
    #[serde(default, alias = "stock_quantity", deserialize_with = "de::null_default")]
    pub stock_level: i64,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub resolved: bool,
    #[serde(default, deserialize_with = "de::text")]
    pub alert_date: Option<String>,
}

/// Rows of `admin_dashboard/low-stock-details/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LowStockDetail {
    pub plant_id: PlantId,
    #[serde(default, alias = "name", deserialize_with = "de::null_default")]
    pub plant_name: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub stock_quantity: i64,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Counts per order status from `admin_dashboard/order-overview/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderOverview {
    #[serde(alias = "status_name", alias = "status")]
    pub order_status: OrderStatus,
    #[serde(default, alias = "count", deserialize_with = "de::null_default")]
    pub order_count: u64,
    #[serde(default, alias = "revenue")]
    pub total_amount: Money,
}

/// Per-agent numbers from `admin_dashboard/delivery-agent-performance/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentPerformance {
    #[serde(alias = "user_id", alias = "id")]
    pub agent_id: UserId,
    #[serde(default, alias = "name")]
    pub agent_name: Option<String>,
    #[serde(default, alias = "total_assignments", deserialize_with = "de::null_default")]
    pub total_deliveries: u64,
    #[serde(default, alias = "completed_assignments", deserialize_with = "de::null_default")]
    pub completed_deliveries: u64,
    #[serde(default)]
    pub avg_delivery_time: Option<f64>,
    #[serde(default)]
    pub total_earnings: Money,
}

/// A discount type offered when applying discounts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiscountType {
    #[serde(alias = "id")]
    pub discount_type_id: DiscountTypeId,
    #[serde(default, alias = "type_name", deserialize_with = "de::null_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A configured discount.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Discount {
    #[serde(alias = "id")]
    pub discount_id: DiscountId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub discount_type: Option<String>,
    #[serde(default)]
    pub discount_value: Money,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub is_percentage: bool,
    #[serde(default, deserialize_with = "de::text")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub is_active: bool,
    #[serde(default)]
    pub plant_name: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
}

/// An entry of the admin activity log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActivityEntry {
    #[serde(default, alias = "log_id", alias = "id")]
    pub activity_id: Option<i64>,
    #[serde(default)]
    pub activity_type: Option<String>,
    #[serde(default, alias = "details")]
    pub description: Option<String>,
    #[serde(default, alias = "user_name")]
    pub username: Option<String>,
    #[serde(default, alias = "activity_date", alias = "created_at", deserialize_with = "de::text")]
    pub timestamp: Option<String>,
}

/// An agent available for assignment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AvailableAgent {
    #[serde(alias = "user_id", alias = "id")]
    pub agent_id: UserId,
    #[serde(default, alias = "name", alias = "full_name")]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "pending_assignments", deserialize_with = "de::null_default")]
    pub active_assignments: u64,
}

/// Body of `admin_dashboard/apply-discount/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountRequest {
    pub discount_type_id: DiscountTypeId,
    pub discount_value: Money,
    pub is_percentage: bool,
    #[serde(serialize_with = "discount_date")]
    pub start_date: NaiveDateTime,
    #[serde(serialize_with = "discount_date")]
    pub end_date: NaiveDateTime,
    pub category_id: Option<CategoryId>,
    pub plant_id: Option<PlantId>,
}

fn discount_date<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(DISCOUNT_DATE_FORMAT))
}

/// Body of `admin_dashboard/activity-log/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityQuery {
    pub activity_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_user_list_shapes() {
        let bare: UserListShape =
            serde_json::from_value(json!([{"user_id": 1, "name": "Ada"}])).unwrap();
        let wrapped: UserListShape =
            serde_json::from_value(json!({"users": [{"id": 2, "username": "bo"}]})).unwrap();
        let empty: UserListShape = serde_json::from_value(json!({})).unwrap();

        assert_eq!(Vec::<UserListEntry>::from(bare)[0].user_id, UserId::new(1));
        assert_eq!(
            Vec::<UserListEntry>::from(wrapped)[0].name.as_deref(),
            Some("bo")
        );
        assert!(Vec::<UserListEntry>::from(empty).is_empty());
    }

    #[test]
    fn test_admin_stats_accepts_camel_case() {
        let stats: AdminStats = serde_json::from_value(json!({
            "totalCustomers": 10, "total_orders": 4, "monthlyRevenue": 120.5
        }))
        .unwrap();
        assert_eq!(stats.total_customers, 10);
        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.monthly_revenue, Money::from_cents(12050));
    }

    #[test]
    fn test_discount_request_date_format() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 30)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let request = DiscountRequest {
            discount_type_id: DiscountTypeId::new(1),
            discount_value: Money::from_cents(1500),
            is_percentage: true,
            start_date: start,
            end_date: end,
            category_id: Some(CategoryId::new(3)),
            plant_id: None,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["start_date"], json!("2024-06-01 00:00:00"));
        assert_eq!(body["end_date"], json!("2024-06-30 23:59:59"));
        assert_eq!(body["plant_id"], json!(null));
    }
}
