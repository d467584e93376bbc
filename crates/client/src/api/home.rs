//! Landing page endpoints.
//!
//! Each list arrives either bare or keyed by its name, e.g.
//! `{"plants": [...]}`.

use serde::Deserialize;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{Category, PlantSummary, SellerSummary};

#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Keyed {
        #[serde(alias = "categories", alias = "plants", alias = "sellers", alias = "data")]
        items: Vec<T>,
    },
    Bare(Vec<T>),
}

impl<T> From<Listing<T>> for Vec<T> {
    fn from(listing: Listing<T>) -> Self {
        match listing {
            Listing::Keyed { items } | Listing::Bare(items) => items,
        }
    }
}

impl ApiClient {
    /// Most popular categories.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn top_categories(&self) -> Result<Vec<Category>, ApiError> {
        let listing: Listing<Category> = self.get("home/top-categories/").await?;
        Ok(listing.into())
    }

    /// Best-selling plants.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn top_plants(&self) -> Result<Vec<PlantSummary>, ApiError> {
        let listing: Listing<PlantSummary> = self.get("home/top-plants/").await?;
        Ok(listing.into())
    }

    /// Sellers with the most sales.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn top_sellers(&self) -> Result<Vec<SellerSummary>, ApiError> {
        let listing: Listing<SellerSummary> = self.get("home/top-sellers/").await?;
        Ok(listing.into())
    }
}
