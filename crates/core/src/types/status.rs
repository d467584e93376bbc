//! Status enums for orders and deliveries.
//!
//! Order status transitions are owned by the backend. The client only
//! parses the label it receives and renders it, so unknown labels are kept
//! verbatim rather than rejected.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Order status as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    OutForDelivery,
    Delivered,
    Cancelled,
    /// A label this client does not know about.
    Other(String),
}

impl OrderStatus {
    /// Parse a backend status label (case-insensitive, `_`/`-`/space agnostic).
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .chars()
            .map(|c| match c {
                '_' | '-' => ' ',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "pending" => Self::Pending,
            "processing" | "confirmed" => Self::Processing,
            "shipped" => Self::Shipped,
            "out for delivery" | "in transit" => Self::OutForDelivery,
            "delivered" | "completed" => Self::Delivered,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    /// Human-readable label, matching the backend's capitalisation.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Other(label) => label,
        }
    }

    /// Whether the order still needs attention (not delivered or cancelled).
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// Outcome a delivery agent reports when confirming a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryConfirmation {
    #[default]
    Delivered,
    Failed,
    Returned,
}

impl fmt::Display for DeliveryConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered => write!(f, "delivered"),
            Self::Failed => write!(f, "failed"),
            Self::Returned => write!(f, "returned"),
        }
    }
}

impl std::str::FromStr for DeliveryConfirmation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivered" => Ok(Self::Delivered),
            "failed" => Ok(Self::Failed),
            "returned" => Ok(Self::Returned),
            _ => Err(format!("invalid confirmation type: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_known() {
        assert_eq!(OrderStatus::from_label("Delivered"), OrderStatus::Delivered);
        assert_eq!(
            OrderStatus::from_label("out_for_delivery"),
            OrderStatus::OutForDelivery
        );
        assert_eq!(OrderStatus::from_label(" SHIPPED "), OrderStatus::Shipped);
    }

    #[test]
    fn test_from_label_unknown_is_kept() {
        let status = OrderStatus::from_label("Awaiting Pickup");
        assert_eq!(status, OrderStatus::Other("Awaiting Pickup".to_string()));
        assert_eq!(status.to_string(), "Awaiting Pickup");
        assert!(status.is_open());
    }

    #[test]
    fn test_is_open() {
        assert!(OrderStatus::Processing.is_open());
        assert!(!OrderStatus::Delivered.is_open());
        assert!(!OrderStatus::Cancelled.is_open());
    }

    #[test]
    fn test_serde_uses_label() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"Out for Delivery\"");
        let parsed: OrderStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(parsed, OrderStatus::Processing);
    }

    #[test]
    fn test_confirmation_round_trip_through_str() {
        let kind: DeliveryConfirmation = "failed".parse().unwrap();
        assert_eq!(kind.to_string(), "failed");
        assert!("lost".parse::<DeliveryConfirmation>().is_err());
    }
}
