//! Plant page endpoints.

use greencart_core::PlantId;
use serde::Deserialize;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{Outcome, PlantCartRequest, PlantDetail, PlantReviewRequest, Review};

#[derive(Deserialize)]
#[serde(untagged)]
enum PlantEnvelope {
    Keyed {
        #[serde(alias = "data")]
        plant: Box<PlantDetail>,
    },
    Bare(Box<PlantDetail>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReviewList {
    Keyed {
        #[serde(alias = "data")]
        reviews: Vec<Review>,
    },
    Bare(Vec<Review>),
}

impl ApiClient {
    /// Full plant detail: sizes, images, features, reviews and any active
    /// discount.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the plant does not exist.
    #[instrument(skip(self), fields(plant_id = %plant_id))]
    pub async fn plant(&self, plant_id: PlantId) -> Result<PlantDetail, ApiError> {
        let envelope: PlantEnvelope = self
            .get(&format!("plant_detail/plant/{plant_id}/"))
            .await?;
        Ok(match envelope {
            PlantEnvelope::Keyed { plant } | PlantEnvelope::Bare(plant) => *plant,
        })
    }

    /// A page of reviews for a plant.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(plant_id = %plant_id))]
    pub async fn plant_reviews(
        &self,
        plant_id: PlantId,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Review>, ApiError> {
        let list: ReviewList = self
            .get_query(
                &format!("plant_detail/reviews/{plant_id}/"),
                &[("limit", limit), ("offset", offset)],
            )
            .await?;
        Ok(match list {
            ReviewList::Keyed { reviews } | ReviewList::Bare(reviews) => reviews,
        })
    }

    /// Review a plant from a delivered order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if the order does not contain the plant
    /// or it was already reviewed.
    #[instrument(skip(self, review), fields(plant_id = %plant_id, rating = review.rating))]
    pub async fn add_plant_review(
        &self,
        plant_id: PlantId,
        review: &PlantReviewRequest,
    ) -> Result<Outcome, ApiError> {
        self.post(&format!("plant_detail/add-review/{plant_id}/"), review)
            .await
    }

    /// Add a plant to the cart by size id, from the plant page.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if stock is insufficient.
    #[instrument(skip(self), fields(plant_id = %request.plant_id))]
    pub async fn add_plant_to_cart(&self, request: &PlantCartRequest) -> Result<Outcome, ApiError> {
        self.post("plant_detail/add-to-cart/", request).await
    }
}
