//! Seller dashboard endpoints.
//!
//! Responses use the `{success, data}` envelope; list payloads may also
//! arrive bare.

use greencart_core::{PlantId, UserId};
use reqwest::multipart::Form;
use serde::Deserialize;
use tracing::instrument;

use super::{ApiClient, Payload, image_part};
use crate::error::ApiError;
use crate::types::{
    AddedPlant, Category, ImageUpload, LowStockPlant, Outcome, PlantPayload, RecordSaleRequest,
    RecordedSale, SaleRecord, SellerPlant, SellerPlantDetail, SellerStats, UploadedImage,
};

#[derive(Deserialize)]
struct ImagesResponse {
    #[serde(alias = "data", alias = "uploaded_images")]
    images: Vec<UploadedImage>,
}

fn images_form(form: Form, images: &[ImageUpload]) -> Result<Form, ApiError> {
    images
        .iter()
        .try_fold(form, |form, image| Ok(form.part("images", image_part(image)?)))
}

impl ApiClient {
    /// Headline numbers for the seller dashboard.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(seller_id = %seller_id))]
    pub async fn seller_stats(&self, seller_id: UserId) -> Result<SellerStats, ApiError> {
        let response: Payload<SellerStats> = self.get(&format!("seller/{seller_id}/stats/")).await?;
        Ok(response.into_inner())
    }

    /// Most recent sales of the seller's plants.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(seller_id = %seller_id))]
    pub async fn seller_recent_sales(&self, seller_id: UserId) -> Result<Vec<SaleRecord>, ApiError> {
        let response: Payload<Vec<SaleRecord>> = self
            .get(&format!("seller/{seller_id}/recent-sales/"))
            .await?;
        Ok(response.into_inner())
    }

    /// Plants running out of stock.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(seller_id = %seller_id))]
    pub async fn seller_low_stock(&self, seller_id: UserId) -> Result<Vec<LowStockPlant>, ApiError> {
        let response: Payload<Vec<LowStockPlant>> = self
            .get(&format!("seller/{seller_id}/low-stock/"))
            .await?;
        Ok(response.into_inner())
    }

    /// Every plant the seller lists.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(seller_id = %seller_id))]
    pub async fn seller_plants(&self, seller_id: UserId) -> Result<Vec<SellerPlant>, ApiError> {
        let response: Payload<Vec<SellerPlant>> =
            self.get(&format!("seller/{seller_id}/plants/")).await?;
        Ok(response.into_inner())
    }

    /// Full sales history.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(seller_id = %seller_id))]
    pub async fn seller_sales(&self, seller_id: UserId) -> Result<Vec<SaleRecord>, ApiError> {
        let response: Payload<Vec<SaleRecord>> =
            self.get(&format!("seller/{seller_id}/sales/")).await?;
        Ok(response.into_inner())
    }

    /// Categories offered by the add-plant form.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn seller_categories(&self) -> Result<Vec<Category>, ApiError> {
        let response: Payload<Vec<Category>> = self.get("seller/categories/").await?;
        Ok(response.into_inner())
    }

    /// A plant's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the plant does not exist.
    #[instrument(skip(self), fields(plant_id = %plant_id))]
    pub async fn seller_plant(&self, plant_id: PlantId) -> Result<SellerPlantDetail, ApiError> {
        let response: Payload<SellerPlantDetail> =
            self.get(&format!("seller/plants/{plant_id}/")).await?;
        Ok(response.into_inner())
    }

    /// List a new plant.
    ///
    /// Without attachments the payload is sent as JSON; with attachments it
    /// becomes multipart and each file is sent under `images`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, payload, attachments), fields(name = %payload.name, attachments = attachments.len()))]
    pub async fn add_plant(
        &self,
        payload: &PlantPayload,
        attachments: &[ImageUpload],
    ) -> Result<AddedPlant, ApiError> {
        let response: Payload<AddedPlant> = if attachments.is_empty() {
            self.post("seller/plants/add/", payload).await?
        } else {
            let form = payload
                .form_fields()
                .into_iter()
                .fold(Form::new(), |form, (name, value)| form.text(name, value));
            let form = images_form(form.text("image_urls", payload.images.clone()), attachments)?;
            self.post_multipart("seller/plants/add/", form).await?
        };
        Ok(response.into_inner())
    }

    /// Update one of the seller's plants.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` if the requestor does not own the plant.
    #[instrument(skip(self, payload), fields(plant_id = %plant_id))]
    pub async fn update_plant(
        &self,
        plant_id: PlantId,
        payload: &PlantPayload,
    ) -> Result<Outcome, ApiError> {
        self.post(&format!("seller/plants/{plant_id}/update/"), payload)
            .await
    }

    /// Upload images ahead of adding or editing a plant.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, images), fields(count = images.len()))]
    pub async fn upload_images(&self, images: &[ImageUpload]) -> Result<Vec<UploadedImage>, ApiError> {
        let form = images_form(Form::new(), images)?;
        let response: ImagesResponse = self.post_multipart("seller/upload-images/", form).await?;
        Ok(response.images)
    }

    /// Record an offline sale.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if stock is insufficient.
    #[instrument(skip(self, request), fields(plant_id = %request.plant_id, quantity = request.quantity))]
    pub async fn record_sale(&self, request: &RecordSaleRequest) -> Result<RecordedSale, ApiError> {
        let response: Payload<RecordedSale> = self.post("seller/record-sale/", request).await?;
        Ok(response.into_inner())
    }
}
