//! Response and request schemas for the GreenCart REST API.
//!
//! Fields the backend may omit or send as `null` are `Option`s or carry
//! `#[serde(default)]`; aliases absorb the naming drift between views
//! (`id` vs `cart_id`, `status` vs `order_status`, ...).

mod admin;
mod cart;
mod delivery;
mod order;
mod plant;
mod seller;
mod user;

pub use admin::*;
pub use cart::*;
pub use delivery::*;
pub use order::*;
pub use plant::*;
pub use seller::*;
pub use user::*;

use serde::Deserialize;

/// Result of a mutation: the server's message, if it sent one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub message: Option<String>,
}

impl Outcome {
    /// The server's message or `fallback`.
    #[must_use]
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}

/// Lenient deserializers for the backend's loosely typed columns.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Treat an explicit `null` like a missing field.
    pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Accept `true`/`false`, `0`/`1`, and `"Y"`/`"N"`-style strings.
    pub fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > f64::EPSILON),
            Value::String(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "1" | "y" | "yes" | "true"
            ),
            _ => false,
        })
    }

    /// Accept a string or a number and keep it as text.
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }
}
