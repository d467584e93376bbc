use greencart_core::{CartItemId, Money, PlantId, UserId};
use serde::{Deserialize, Serialize};

use super::de;

/// One line of the user's cart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartItem {
    #[serde(alias = "id", alias = "cart_item_id")]
    pub cart_id: CartItemId,
    #[serde(default)]
    pub plant_id: Option<PlantId>,
    #[serde(default, alias = "plant_name", deserialize_with = "de::null_default")]
    pub name: String,
    #[serde(default, alias = "image_url", alias = "primary_image")]
    pub image: Option<String>,
    #[serde(default, alias = "size_name")]
    pub size: Option<String>,
    #[serde(default, alias = "unit_price")]
    pub price: Money,
    #[serde(default, deserialize_with = "de::null_default")]
    pub quantity: u32,
    #[serde(default, alias = "seller_name")]
    pub seller: Option<String>,
    #[serde(default, alias = "is_selected", deserialize_with = "de::flexible_bool")]
    pub selected: bool,
}

impl CartItem {
    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// Items the user has ticked for checkout.
#[must_use]
pub fn selected_items(items: &[CartItem]) -> Vec<&CartItem> {
    items.iter().filter(|i| i.selected).collect()
}

/// Sum of line totals over the selected items.
#[must_use]
pub fn selected_subtotal(items: &[CartItem]) -> Money {
    items
        .iter()
        .filter(|i| i.selected)
        .map(CartItem::line_total)
        .sum()
}

/// Body of `cart/add/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddToCartRequest {
    pub user_id: UserId,
    pub plant_id: PlantId,
    pub size: String,
    pub quantity: u32,
}

/// Body of `cart/toggle/` and `cart/delete/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct CartItemRef {
    pub cart_id: CartItemId,
    pub user_id: UserId,
}

/// Body of `cart/update_quantity/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct CartQuantity {
    pub cart_id: CartItemId,
    pub user_id: UserId,
    pub quantity: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn items() -> Vec<CartItem> {
        serde_json::from_value(json!([
            {"cart_id": 1, "plant_id": 7, "name": "Monstera", "size": "Medium", "price": 25.5, "quantity": 2, "selected": 1},
            {"id": 2, "plant_name": "Pothos", "price": "12.00", "quantity": 1, "selected": 0},
            {"cart_id": 3, "name": "Fern", "price": 8, "quantity": 3, "is_selected": "Y"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_aliases_and_flags() {
        let items = items();
        assert_eq!(items[1].cart_id, CartItemId::new(2));
        assert_eq!(items[1].name, "Pothos");
        assert!(items[0].selected);
        assert!(!items[1].selected);
        assert!(items[2].selected);
    }

    #[test]
    fn test_selected_subtotal() {
        let items = items();
        assert_eq!(selected_items(&items).len(), 2);
        assert_eq!(selected_subtotal(&items), Money::from_cents(5100 + 2400));
    }
}
