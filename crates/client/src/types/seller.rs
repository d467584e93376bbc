use greencart_core::{CategoryId, Money, OrderId, OrderStatus, PlantId, UserId};
use serde::{Deserialize, Serialize};

use super::de;
use super::order::comma_ids;

/// Headline numbers on the seller dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SellerStats {
    #[serde(default, deserialize_with = "de::null_default")]
    pub total_plants: u64,
    #[serde(default, deserialize_with = "de::null_default")]
    pub total_sold: u64,
    #[serde(default)]
    pub total_earnings: Money,
    #[serde(default, deserialize_with = "de::null_default")]
    pub low_stock_count: u64,
}

/// A sale of one of the seller's plants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaleRecord {
    pub order_id: OrderId,
    #[serde(default, deserialize_with = "de::text")]
    pub order_number: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub order_date: Option<String>,
    #[serde(default, alias = "name", deserialize_with = "de::null_default")]
    pub plant_name: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Option<Money>,
    #[serde(default)]
    pub total_amount: Money,
    #[serde(default)]
    pub seller_earnings: Option<Money>,
    #[serde(default, alias = "status")]
    pub order_status: Option<OrderStatus>,
}

/// One of the seller's listed plants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SellerPlant {
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
    #[serde(default, deserialize_with = "de::text")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub primary_image: Option<String>,
    /// Category names joined with `", "`.
    #[serde(default)]
    pub categories: Option<String>,
}

impl SellerPlant {
    /// Category names as a list.
    #[must_use]
    pub fn category_names(&self) -> Vec<&str> {
        self.categories
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Plant that is running out of stock.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LowStockPlant {
    #[serde(alias = "id")]
    pub plant_id: PlantId,
    #[serde(default, alias = "plant_name", deserialize_with = "de::null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub stock_quantity: i64,
    #[serde(default)]
    pub base_price: Money,
}

/// Plant fields loaded into the edit form.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SellerPlantDetail {
    #[serde(default)]
    pub plant_id: Option<PlantId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub base_price: Option<Money>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default, deserialize_with = "de::text")]
    pub category_ids: Option<String>,
    #[serde(default)]
    pub features: Option<String>,
    #[serde(default)]
    pub care_tips: Option<String>,
    #[serde(default)]
    pub sizes: Option<String>,
    #[serde(default, alias = "image_urls")]
    pub images: Option<String>,
}

/// An image stored by `seller/upload-images/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedImage {
    pub url: String,
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Result of `seller/plants/add/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddedPlant {
    #[serde(default)]
    pub plant_id: Option<PlantId>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of `seller/record-sale/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordedSale {
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub total_amount: Option<Money>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A file to upload as part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Guess the MIME type from the file extension.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let mime = match ext.as_str() {
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "jpg" | "jpeg" => "image/jpeg",
            _ => "application/octet-stream",
        }
        .to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }
}

/// Body of `seller/plants/add/` and `seller/plants/:id/update/`.
///
/// List-valued fields go over the wire as comma-joined strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requestor_id: Option<UserId>,
    pub name: String,
    pub description: String,
    pub base_price: Money,
    pub stock_quantity: u32,
    #[serde(serialize_with = "comma_ids")]
    pub category_ids: Vec<CategoryId>,
    pub features: String,
    pub care_tips: String,
    pub sizes: String,
    pub images: String,
}

impl PlantPayload {
    /// Text fields as `(name, value)` pairs for a multipart body.
    pub(crate) fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(11);
        if let Some(id) = self.seller_id {
            fields.push(("seller_id", id.to_string()));
        }
        if let Some(id) = self.requestor_id {
            fields.push(("requestor_id", id.to_string()));
        }
        fields.extend([
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("base_price", self.base_price.amount().to_string()),
            ("stock_quantity", self.stock_quantity.to_string()),
            (
                "category_ids",
                self.category_ids
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            ("features", self.features.clone()),
            ("care_tips", self.care_tips.clone()),
            ("sizes", self.sizes.clone()),
        ]);
        fields
    }
}

/// Body of `seller/record-sale/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSaleRequest {
    pub seller_id: UserId,
    pub plant_id: PlantId,
    pub quantity: u32,
    pub customer_email: String,
    pub sale_price: Money,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_seller_plant_categories() {
        let plant: SellerPlant = serde_json::from_value(json!({
            "plant_id": 3, "name": "Aloe", "base_price": 9.5, "stock_quantity": 4,
            "categories": "Succulents, Indoor Plants"
        }))
        .unwrap();
        assert_eq!(plant.category_names(), vec!["Succulents", "Indoor Plants"]);
    }

    #[test]
    fn test_plant_payload_wire_format() {
        let payload = PlantPayload {
            seller_id: Some(UserId::new(2)),
            requestor_id: None,
            name: "Aloe".into(),
            description: "Soothing".into(),
            base_price: Money::from_cents(950),
            stock_quantity: 4,
            category_ids: vec![CategoryId::new(1), CategoryId::new(4)],
            features: "Hardy,Low water".into(),
            care_tips: "Bright light".into(),
            sizes: "Small,Large".into(),
            images: String::new(),
        };
        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["category_ids"], json!("1,4"));
        assert_eq!(body["seller_id"], json!(2));
        assert!(body.get("requestor_id").is_none());

        let fields = payload.form_fields();
        assert!(fields.contains(&("category_ids", "1,4".to_string())));
        assert!(fields.contains(&("base_price", "9.50".to_string())));
    }

    #[test]
    fn test_image_upload_mime() {
        assert_eq!(ImageUpload::new("leaf.PNG", vec![]).mime, "image/png");
        assert_eq!(ImageUpload::new("leaf.jpeg", vec![]).mime, "image/jpeg");
        assert_eq!(
            ImageUpload::new("notes", vec![]).mime,
            "application/octet-stream"
        );
    }
}
