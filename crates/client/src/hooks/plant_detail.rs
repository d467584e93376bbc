//! Plant page: detail, reviews, add to cart.

use greencart_core::{OrderId, PlantId};
use tokio::sync::watch;
use tracing::instrument;

use super::{Resource, Scope, require_user};
use crate::api::ApiClient;
use crate::cancel::CancelToken;
use crate::error::ApiError;
use crate::forms::FormError;
use crate::types::{Outcome, PlantCartRequest, PlantDetail, PlantReviewRequest, Review};

/// Reviews fetched per page.
pub const REVIEW_PAGE_SIZE: u32 = 10;

/// Plant page state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantDetailState {
    pub plant_id: PlantId,
    pub plant: Resource<Option<PlantDetail>>,
    pub reviews: Resource<Vec<Review>>,
}

/// Plant page hook.
pub struct PlantDetailHook {
    scope: Scope<PlantDetailState>,
}

impl PlantDetailHook {
    /// Create the hook and load the plant with its reviews.
    pub async fn mount(api: &ApiClient, plant_id: PlantId) -> Self {
        let hook = Self {
            scope: Scope::new(
                api,
                PlantDetailState {
                    plant_id,
                    plant: Resource::pending(),
                    reviews: Resource::pending(),
                },
            ),
        };
        hook.refresh().await;
        hook
    }

    #[must_use]
    pub fn state(&self) -> PlantDetailState {
        self.scope.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlantDetailState> {
        self.scope.subscribe()
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancelToken {
        self.scope.cancel_token()
    }

    fn plant_id(&self) -> PlantId {
        self.scope.snapshot().plant_id
    }

    /// Re-fetch the plant. Reviews embedded in the detail are used as the
    /// first page; otherwise the first page is fetched separately.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let plant_id = self.plant_id();
        let api = self.scope.api();
        self.scope
            .load(|s| &mut s.plant, async {
                api.plant(plant_id).await.map(Some)
            })
            .await;

        let embedded = self
            .scope
            .snapshot()
            .plant
            .data
            .map(|p| p.reviews)
            .unwrap_or_default();
        if embedded.is_empty() {
            self.scope
                .load(
                    |s| &mut s.reviews,
                    api.plant_reviews(plant_id, REVIEW_PAGE_SIZE, 0),
                )
                .await;
        } else {
            self.scope.modify(|s| {
                s.reviews = Resource {
                    data: embedded,
                    loading: false,
                    error: None,
                };
            });
        }
    }

    /// Append the next page of reviews.
    #[instrument(skip(self))]
    pub async fn load_more_reviews(&self) {
        let state = self.scope.snapshot();
        let offset = u32::try_from(state.reviews.data.len()).unwrap_or(u32::MAX);
        let mut reviews = state.reviews.data;
        let api = self.scope.api();
        self.scope
            .load(|s| &mut s.reviews, async move {
                let page = api
                    .plant_reviews(state.plant_id, REVIEW_PAGE_SIZE, offset)
                    .await?;
                reviews.extend(page);
                Ok::<_, ApiError>(reviews)
            })
            .await;
    }

    /// Add `quantity` of the named size to the cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the plant is not loaded, and
    /// `ApiError::Validation` if nobody is signed in, the size is unknown
    /// or the quantity is zero.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, size: &str, quantity: u32) -> Result<Outcome, ApiError> {
        let user_id = require_user(self.scope.api())?;
        let state = self.scope.snapshot();
        let plant = state.plant.data.ok_or(ApiError::NotFound)?;
        let size = plant.size_named(size).ok_or(FormError::SizeRequired)?;
        if quantity < 1 {
            return Err(FormError::InvalidQuantity.into());
        }
        self.scope
            .api()
            .add_plant_to_cart(&PlantCartRequest {
                user_id,
                plant_id: plant.plant_id,
                size_id: size.size_id,
                quantity,
            })
            .await
    }

    /// Review this plant from a delivered order, then re-fetch.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a rating outside `1..=5`,
    /// otherwise the API error.
    #[instrument(skip(self, review_text))]
    pub async fn add_review(
        &self,
        order_id: OrderId,
        rating: u8,
        review_text: &str,
    ) -> Result<Outcome, ApiError> {
        let user_id = require_user(self.scope.api())?;
        if !(1..=5).contains(&rating) {
            return Err(FormError::InvalidRating.into());
        }
        let outcome = self
            .scope
            .api()
            .add_plant_review(
                self.plant_id(),
                &PlantReviewRequest {
                    user_id,
                    order_id,
                    rating,
                    review_text: review_text.trim().to_string(),
                },
            )
            .await?;
        self.refresh().await;
        Ok(outcome)
    }
}
