//! Seller dashboard.

use greencart_core::PlantId;
use tokio::sync::watch;
use tracing::{info, instrument};

use super::{Resource, Scope, require_user};
use crate::api::ApiClient;
use crate::cancel::CancelToken;
use crate::error::ApiError;
use crate::forms::{PlantForm, RecordSaleForm};
use crate::types::{
    AddedPlant, Category, ImageUpload, LowStockPlant, Outcome, RecordedSale, SaleRecord,
    SellerPlant, SellerPlantDetail, SellerStats, UploadedImage,
};

/// Seller dashboard state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SellerState {
    pub stats: Resource<SellerStats>,
    pub recent_sales: Resource<Vec<SaleRecord>>,
    pub low_stock: Resource<Vec<LowStockPlant>>,
    /// Always a list; empty when the fetch fails.
    pub plants: Resource<Vec<SellerPlant>>,
    pub sales: Resource<Vec<SaleRecord>>,
    pub categories: Resource<Vec<Category>>,
}

/// Seller dashboard hook for the signed-in seller.
pub struct SellerDashboardHook {
    scope: Scope<SellerState>,
}

impl SellerDashboardHook {
    /// Create the hook and load the dashboard.
    pub async fn mount(api: &ApiClient) -> Self {
        let hook = Self {
            scope: Scope::new(
                api,
                SellerState {
                    stats: Resource::pending(),
                    recent_sales: Resource::pending(),
                    low_stock: Resource::pending(),
                    plants: Resource::pending(),
                    sales: Resource::pending(),
                    categories: Resource::pending(),
                },
            ),
        };
        hook.refresh().await;
        hook
    }

    #[must_use]
    pub fn state(&self) -> SellerState {
        self.scope.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SellerState> {
        self.scope.subscribe()
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancelToken {
        self.scope.cancel_token()
    }

    /// Re-fetch every slice concurrently.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let api = self.scope.api();
        tokio::join!(
            self.refresh_overview(),
            self.refresh_plants(),
            self.refresh_sales(),
            self.scope
                .load(|s| &mut s.categories, api.seller_categories()),
        );
    }

    async fn refresh_overview(&self) {
        let api = self.scope.api();
        tokio::join!(
            self.scope.load(|s| &mut s.stats, async {
                api.seller_stats(require_user(api)?).await
            }),
            self.scope.load(|s| &mut s.recent_sales, async {
                api.seller_recent_sales(require_user(api)?).await
            }),
            self.scope.load(|s| &mut s.low_stock, async {
                api.seller_low_stock(require_user(api)?).await
            }),
        );
    }

    async fn refresh_plants(&self) {
        let api = self.scope.api();
        self.scope
            .load_or_clear(|s| &mut s.plants, async {
                api.seller_plants(require_user(api)?).await
            })
            .await;
    }

    async fn refresh_sales(&self) {
        let api = self.scope.api();
        self.scope
            .load(|s| &mut s.sales, async {
                api.seller_sales(require_user(api)?).await
            })
            .await;
    }

    /// List a new plant, then re-fetch plants and stats.
    ///
    /// Attachments switch the request to multipart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid form, otherwise the API
    /// error.
    #[instrument(skip_all, fields(name = %form.name))]
    pub async fn add_plant(
        &self,
        form: &PlantForm,
        attachments: &[ImageUpload],
    ) -> Result<AddedPlant, ApiError> {
        let api = self.scope.api();
        let payload = form.validate_new(require_user(api)?)?;
        let added = api.add_plant(&payload, attachments).await?;
        info!(plant_id = ?added.plant_id, "Plant listed");
        tokio::join!(self.refresh_plants(), self.refresh_overview());
        Ok(added)
    }

    /// Update a listed plant, then re-fetch plants.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid form, otherwise the API
    /// error.
    #[instrument(skip(self, form))]
    pub async fn update_plant(
        &self,
        plant_id: PlantId,
        form: &PlantForm,
    ) -> Result<Outcome, ApiError> {
        let api = self.scope.api();
        let payload = form.validate_update(require_user(api)?)?;
        let outcome = api.update_plant(plant_id, &payload).await?;
        tokio::join!(self.refresh_plants(), self.refresh_overview());
        Ok(outcome)
    }

    /// Upload images and return their URLs for a plant form.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    pub async fn upload_images(&self, images: &[ImageUpload]) -> Result<Vec<UploadedImage>, ApiError> {
        self.scope.api().upload_images(images).await
    }

    /// Record an offline sale, then re-fetch sales and stats.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid form, otherwise the API
    /// error.
    #[instrument(skip_all)]
    pub async fn record_sale(&self, form: &RecordSaleForm) -> Result<RecordedSale, ApiError> {
        let api = self.scope.api();
        let request = form.validate(require_user(api)?)?;
        let recorded = api.record_sale(&request).await?;
        tokio::join!(self.refresh_sales(), self.refresh_overview());
        Ok(recorded)
    }

    /// Editable fields of one plant, for the edit form.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    pub async fn plant_detail(&self, plant_id: PlantId) -> Result<SellerPlantDetail, ApiError> {
        self.scope.api().seller_plant(plant_id).await
    }
}
