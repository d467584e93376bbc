use greencart_core::{
    CartItemId, DeliveryMethodId, Money, OrderId, OrderItemId, OrderStatus, PlantId, SizeId,
    UserId,
};
use serde::{Deserialize, Serialize, Serializer};

use super::de;

/// Row of the customer's order list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderSummary {
    #[serde(alias = "id")]
    pub order_id: OrderId,
    #[serde(default, deserialize_with = "de::text")]
    pub order_number: Option<String>,
    #[serde(default, alias = "date", deserialize_with = "de::text")]
    pub order_date: Option<String>,
    #[serde(default, alias = "status", alias = "status_name")]
    pub order_status: OrderStatus,
    #[serde(default, alias = "total")]
    pub total_amount: Money,
    #[serde(default)]
    pub delivery_method: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub estimated_delivery_date: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub actual_delivery_date: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub item_count: Option<u32>,
    #[serde(default)]
    pub items_summary: Option<String>,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub customer_confirmed: bool,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub agent_confirmed: bool,
    #[serde(default, deserialize_with = "de::text")]
    pub confirmed_date: Option<String>,
    #[serde(default)]
    pub primary_image: Option<String>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub items: Vec<ReviewableItem>,
}

impl OrderSummary {
    /// Order number if present, otherwise `#<id>`.
    #[must_use]
    pub fn reference(&self) -> String {
        self.order_number
            .clone()
            .unwrap_or_else(|| format!("#{}", self.order_id))
    }

    /// Delivered by the agent but not yet confirmed by the customer.
    #[must_use]
    pub const fn awaiting_customer_confirmation(&self) -> bool {
        self.agent_confirmed && !self.customer_confirmed
    }
}

/// Item of a completed order, flagged when the customer already reviewed it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewableItem {
    pub plant_id: PlantId,
    #[serde(default, alias = "name", deserialize_with = "de::null_default")]
    pub plant_name: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub quantity: u32,
    #[serde(default, alias = "size")]
    pub size_name: Option<String>,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub has_review: bool,
}

/// Counters shown on the customer dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderStats {
    #[serde(default, deserialize_with = "de::null_default")]
    pub total_orders: u64,
    #[serde(default, deserialize_with = "de::null_default")]
    pub pending_orders: u64,
    #[serde(default, deserialize_with = "de::null_default")]
    pub delivered_orders: u64,
    #[serde(default)]
    pub total_spent: Money,
}

/// Full order with line items.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderDetail {
    #[serde(alias = "id")]
    pub order_id: OrderId,
    #[serde(default, deserialize_with = "de::text")]
    pub order_number: Option<String>,
    #[serde(default, alias = "date", deserialize_with = "de::text")]
    pub order_date: Option<String>,
    #[serde(default, alias = "status", alias = "status_name")]
    pub order_status: OrderStatus,
    #[serde(default, alias = "total")]
    pub total_amount: Money,
    #[serde(default)]
    pub delivery_method: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub delivery_notes: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub estimated_delivery_date: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub actual_delivery_date: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub agent_phone: Option<String>,
    #[serde(default, alias = "order_items", deserialize_with = "de::null_default")]
    pub items: Vec<OrderItem>,
}

impl OrderDetail {
    /// Sum of the line totals as reported by the server.
    #[must_use]
    pub fn items_total(&self) -> Money {
        self.items.iter().map(|i| i.item_total).sum()
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub order_item_id: Option<OrderItemId>,
    pub plant_id: PlantId,
    #[serde(default, alias = "name", deserialize_with = "de::null_default")]
    pub plant_name: String,
    #[serde(default)]
    pub size_id: Option<SizeId>,
    #[serde(default, alias = "size")]
    pub size_name: Option<String>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Money,
    #[serde(default)]
    pub discount_applied: Money,
    #[serde(default)]
    pub item_total: Money,
    #[serde(default, alias = "image")]
    pub plant_image: Option<String>,
}

/// Shipping option offered at checkout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeliveryMethod {
    #[serde(alias = "method_id")]
    pub id: DeliveryMethodId,
    #[serde(default, deserialize_with = "de::null_default")]
    pub name: String,
    #[serde(default, alias = "base_cost")]
    pub price: Money,
    #[serde(default, alias = "estimated_days", deserialize_with = "de::text")]
    pub time: Option<String>,
}

/// Result of `order/create-order/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedOrder {
    pub order_id: OrderId,
    #[serde(default, deserialize_with = "de::text")]
    pub order_number: Option<String>,
    #[serde(default)]
    pub total_amount: Money,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `order/create-order/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    pub user_id: UserId,
    pub delivery_method_id: DeliveryMethodId,
    pub delivery_address: String,
    pub delivery_notes: String,
    #[serde(serialize_with = "comma_ids")]
    pub cart_ids: Vec<CartItemId>,
}

/// Body of `order/confirm-delivery/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct ConfirmReceipt {
    pub order_id: OrderId,
    pub user_id: UserId,
}

/// Body of `order/add-review/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReviewRequest {
    pub user_id: UserId,
    pub plant_id: PlantId,
    pub order_id: OrderId,
    pub rating: u8,
    pub review_text: String,
}

/// Serialise a list of ids as `"1,2,3"`.
pub(crate) fn comma_ids<S, T>(ids: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: std::fmt::Display,
{
    let joined = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    serializer.serialize_str(&joined)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_order_summary_aliases() {
        let order: OrderSummary = serde_json::from_value(json!({
            "order_id": 31,
            "order_number": "GC-0031",
            "status": "Out for Delivery",
            "total_amount": 64.5,
            "customer_confirmed": 0,
            "agent_confirmed": 1,
            "tracking_number": 88812
        }))
        .unwrap();
        assert_eq!(order.order_status, OrderStatus::OutForDelivery);
        assert_eq!(order.tracking_number.as_deref(), Some("88812"));
        assert!(order.awaiting_customer_confirmation());
        assert_eq!(order.reference(), "GC-0031");
    }

    #[test]
    fn test_order_detail_items() {
        let detail: OrderDetail = serde_json::from_value(json!({
            "order_id": 5,
            "order_status": "Delivered",
            "items": [
                {"order_item_id": 1, "plant_id": 7, "plant_name": "Monstera", "quantity": 2, "unit_price": 25, "item_total": 50},
                {"order_item_id": 2, "plant_id": 9, "plant_name": "Fern", "quantity": 1, "unit_price": 8, "item_total": 8}
            ]
        }))
        .unwrap();
        assert_eq!(detail.order_status, OrderStatus::Delivered);
        assert_eq!(detail.items.len(), 2);
        assert_eq!(detail.items_total(), Money::from_cents(5800));
    }

    #[test]
    fn test_create_order_joins_cart_ids() {
        let request = CreateOrderRequest {
            user_id: UserId::new(3),
            delivery_method_id: DeliveryMethodId::new(1),
            delivery_address: "12 Fern Lane".into(),
            delivery_notes: String::new(),
            cart_ids: vec![CartItemId::new(1), CartItemId::new(2)],
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["cart_ids"], json!("1,2"));
    }
}
