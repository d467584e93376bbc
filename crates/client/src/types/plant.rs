use greencart_core::{CategoryId, DiscountId, Money, PlantId, ReviewId, SizeId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de;

/// A plant category.
///
/// Some views serialise categories as objects, others hand back raw cursor
/// rows (`[id, name, slug, description]`); both decode to this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CategoryRepr")]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryRepr {
    Object {
        #[serde(alias = "id")]
        category_id: CategoryId,
        #[serde(default, alias = "category_name", deserialize_with = "de::null_default")]
        name: String,
        #[serde(default)]
        slug: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default, alias = "image_url")]
        image: Option<String>,
    },
    Row(Vec<Value>),
}

impl TryFrom<CategoryRepr> for Category {
    type Error = String;

    fn try_from(repr: CategoryRepr) -> Result<Self, Self::Error> {
        match repr {
            CategoryRepr::Object {
                category_id,
                name,
                slug,
                description,
                image,
            } => Ok(Self {
                category_id,
                name,
                slug,
                description,
                image,
            }),
            CategoryRepr::Row(row) => {
                let text = |i: usize| row.get(i).and_then(Value::as_str).map(str::to_string);
                let category_id = row
                    .first()
                    .and_then(Value::as_i64)
                    .ok_or_else(|| "category row has no numeric id".to_string())?;
                Ok(Self {
                    category_id: CategoryId::new(category_id),
                    name: text(1).unwrap_or_default(),
                    slug: text(2),
                    description: text(3),
                    image: text(4),
                })
            }
        }
    }
}

impl Category {
    /// Slug used in `/plants/:category`, derived from the name if absent.
    #[must_use]
    pub fn slug_or_derived(&self) -> String {
        self.slug.clone().unwrap_or_else(|| {
            self.name
                .trim()
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
        })
    }
}

/// Plant card as listed in collections and on the home page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlantSummary {
    #[serde(alias = "id")]
    pub plant_id: PlantId,
    #[serde(default, deserialize_with = "de::null_default")]
    pub name: String,
    #[serde(default, alias = "base_price")]
    pub price: Option<Money>,
    #[serde(default, alias = "primary_image", alias = "image_url")]
    pub image: Option<String>,
    #[serde(default, alias = "rating")]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default, alias = "seller_name")]
    pub seller: Option<String>,
}

/// Seller card on the home page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SellerSummary {
    #[serde(alias = "user_id", alias = "id")]
    pub seller_id: UserId,
    #[serde(default, alias = "seller_name", alias = "username", deserialize_with = "de::null_default")]
    pub name: String,
    #[serde(default, alias = "total_sold")]
    pub total_sales: Option<u64>,
    #[serde(default, alias = "avg_rating")]
    pub rating: Option<f64>,
    #[serde(default, alias = "profile_image")]
    pub image: Option<String>,
}

/// One size option of a plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantSize {
    #[serde(alias = "id")]
    pub size_id: SizeId,
    #[serde(alias = "name", default, deserialize_with = "de::null_default")]
    pub size_name: String,
    #[serde(default)]
    pub price_adjustment: Money,
}

/// A published review.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Review {
    #[serde(alias = "id")]
    pub review_id: ReviewId,
    #[serde(default, alias = "user_name", alias = "username")]
    pub author: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, alias = "text", alias = "comment")]
    pub review_text: Option<String>,
    #[serde(default, alias = "date", deserialize_with = "de::text")]
    pub review_date: Option<String>,
}

/// The best discount currently active on a plant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlantDiscount {
    #[serde(default)]
    pub discount_id: Option<DiscountId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub discount_value: Money,
    #[serde(default, deserialize_with = "de::flexible_bool")]
    pub is_percentage: bool,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl PlantDiscount {
    /// Apply the discount to a price, never going below zero.
    #[must_use]
    pub fn apply(&self, price: Money) -> Money {
        let amount = price.amount();
        let off = if self.is_percentage {
            amount * self.discount_value.amount() / rust_decimal::Decimal::ONE_HUNDRED
        } else {
            self.discount_value.amount()
        };
        Money::new((amount - off).max(rust_decimal::Decimal::ZERO))
    }
}

/// Full plant page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlantDetail {
    #[serde(alias = "id")]
    pub plant_id: PlantId,
    #[serde(default, deserialize_with = "de::null_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub base_price: Money,
    #[serde(default, deserialize_with = "de::null_default")]
    pub stock_quantity: i64,
    #[serde(default)]
    pub primary_image: Option<String>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub avg_rating: f64,
    #[serde(default, deserialize_with = "de::null_default")]
    pub review_count: u32,
    #[serde(default, deserialize_with = "de::null_default")]
    pub image_urls: Vec<String>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub sizes: Vec<PlantSize>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub care_tips: Vec<String>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub discount: Option<PlantDiscount>,
}

impl PlantDetail {
    /// Look up a size by name, case-insensitively.
    #[must_use]
    pub fn size_named(&self, name: &str) -> Option<&PlantSize> {
        self.sizes
            .iter()
            .find(|s| s.size_name.eq_ignore_ascii_case(name.trim()))
    }

    /// Unit price for a size, before discounts.
    #[must_use]
    pub fn price_for(&self, size: &PlantSize) -> Money {
        self.base_price + size.price_adjustment
    }

    /// Unit price for a size after the active discount.
    #[must_use]
    pub fn discounted_price_for(&self, size: &PlantSize) -> Money {
        let price = self.price_for(size);
        self.discount.as_ref().map_or(price, |d| d.apply(price))
    }

    /// Whether any stock is left.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

/// Body of `plant_detail/add-to-cart/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantCartRequest {
    pub user_id: UserId,
    pub plant_id: PlantId,
    pub size_id: SizeId,
    pub quantity: u32,
}

/// Body of `plant_detail/add-review/:id/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantReviewRequest {
    pub user_id: UserId,
    pub order_id: greencart_core::OrderId,
    pub rating: u8,
    pub review_text: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_category_object_and_row() {
        let categories: Vec<Category> = serde_json::from_value(json!([
            {"category_id": 1, "name": "Succulents", "slug": "succulents"},
            [2, "Indoor Plants", "indoor-plants", "Perfect indoors"],
            {"id": 3, "name": "Pet Friendly"}
        ]))
        .unwrap();
        assert_eq!(categories[0].slug_or_derived(), "succulents");
        assert_eq!(categories[1].category_id, CategoryId::new(2));
        assert_eq!(categories[1].description.as_deref(), Some("Perfect indoors"));
        assert_eq!(categories[2].slug_or_derived(), "pet-friendly");
    }

    #[test]
    fn test_plant_detail_with_discount() {
        let plant: PlantDetail = serde_json::from_value(json!({
            "plant_id": 7,
            "name": "Monstera",
            "base_price": 40.0,
            "stock_quantity": 3,
            "sizes": [
                {"size_id": 1, "size_name": "Small", "price_adjustment": 0},
                {"size_id": 2, "size_name": "Medium", "price_adjustment": 10}
            ],
            "reviews": [{"review_id": 9, "author": "Fern G", "rating": 5.0, "review_text": "Lush", "review_date": "2024-05-01"}],
            "discount": {"discount_id": 1, "discount_value": 10, "is_percentage": 1},
            "features": null
        }))
        .unwrap();
        let medium = plant.size_named("medium").unwrap();
        assert_eq!(plant.price_for(medium), Money::from_cents(5000));
        assert_eq!(plant.discounted_price_for(medium), Money::from_cents(4500));
        assert!(plant.features.is_empty());
        assert!(plant.in_stock());
    }

    #[test]
    fn test_flat_discount_floors_at_zero() {
        let discount = PlantDiscount {
            discount_id: None,
            name: None,
            description: None,
            discount_value: Money::from_cents(2000),
            is_percentage: false,
            start_date: None,
            end_date: None,
        };
        assert_eq!(discount.apply(Money::from_cents(1500)), Money::ZERO);
    }
}
