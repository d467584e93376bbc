//! User roles.
//!
//! A role decides which dashboard a session lands on and which endpoint
//! groups it may call. The backend is the authority; the client only uses
//! the tag for navigation and form validation.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when a role tag is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleError(pub String);

/// Account role.
///
/// Serialized as its snake_case wire tag; deserialization is
/// case-insensitive and accepts the aliases the backend uses in its
/// user-list routes (`sales`, `delivery`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Shopper browsing plants and placing orders.
    #[default]
    Customer,
    /// Lists plants and records sales.
    Seller,
    /// Delivers assigned orders.
    DeliveryAgent,
    /// Manages users, orders, discounts and stock alerts.
    Admin,
}

impl Role {
    /// All roles in signup order.
    pub const ALL: [Self; 4] = [Self::Customer, Self::Seller, Self::DeliveryAgent, Self::Admin];

    /// Wire tag used in `role_name` fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Seller => "seller",
            Self::DeliveryAgent => "delivery_agent",
            Self::Admin => "admin",
        }
    }

    /// Privileged roles must present a secret key at signup.
    #[must_use]
    pub const fn requires_secret_key(&self) -> bool {
        !matches!(self, Self::Customer)
    }

    /// Segment used by the admin user-list endpoint.
    #[must_use]
    pub const fn user_list_segment(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Seller => "sales",
            Self::DeliveryAgent => "delivery",
            Self::Admin => "admin",
        }
    }

    /// Landing page after login.
    #[must_use]
    pub const fn dashboard_path(&self) -> &'static str {
        match self {
            Self::Customer => "/orders",
            Self::Seller => "/seller",
            Self::DeliveryAgent => "/delivery",
            Self::Admin => "/admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "seller" | "sales" => Ok(Self::Seller),
            "delivery_agent" | "delivery" | "delivery agent" => Ok(Self::DeliveryAgent),
            "admin" => Ok(Self::Admin),
            other => Err(RoleError(other.to_string())),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_key_roles() {
        assert!(!Role::Customer.requires_secret_key());
        assert!(Role::Seller.requires_secret_key());
        assert!(Role::DeliveryAgent.requires_secret_key());
        assert!(Role::Admin.requires_secret_key());
    }

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!("delivery".parse::<Role>().unwrap(), Role::DeliveryAgent);
        assert_eq!("Sales".parse::<Role>().unwrap(), Role::Seller);
        assert_eq!(" admin ".parse::<Role>().unwrap(), Role::Admin);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::DeliveryAgent).unwrap();
        assert_eq!(json, "\"delivery_agent\"");
        let parsed: Role = serde_json::from_str("\"delivery\"").unwrap();
        assert_eq!(parsed, Role::DeliveryAgent);
        let parsed: Role = serde_json::from_str("\"Seller\"").unwrap();
        assert_eq!(parsed, Role::Seller);
        assert!(serde_json::from_str::<Role>("\"owner\"").is_err());
    }
}
