//! Plant collection endpoints.

use serde::Deserialize;
use tracing::instrument;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{Category, PlantSummary};

/// `{"plants": [...]}` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlantList {
    Keyed {
        #[serde(alias = "data", alias = "results")]
        plants: Vec<PlantSummary>,
    },
    Bare(Vec<PlantSummary>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryList {
    Keyed {
        #[serde(alias = "data")]
        categories: Vec<Category>,
    },
    Bare(Vec<Category>),
}

impl From<PlantList> for Vec<PlantSummary> {
    fn from(list: PlantList) -> Self {
        match list {
            PlantList::Keyed { plants } | PlantList::Bare(plants) => plants,
        }
    }
}

impl ApiClient {
    /// Plants in the category with the given slug.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown or empty slug.
    #[instrument(skip(self))]
    pub async fn plants_by_category(&self, slug: &str) -> Result<Vec<PlantSummary>, ApiError> {
        let list: PlantList = self
            .get_segments(&["plant_collection", "category", slug])
            .await?;
        Ok(list.into())
    }

    /// Full-text search over plants. An empty query lists every plant.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_plants(&self, query: &str) -> Result<Vec<PlantSummary>, ApiError> {
        let list: PlantList = self
            .get_query("plant_collection/search/", &[("q", query)])
            .await?;
        Ok(list.into())
    }

    /// Every category, for filters and the add-plant form.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_categories(&self) -> Result<Vec<Category>, ApiError> {
        let list: CategoryList = self.get("plant_collection/categories/").await?;
        Ok(match list {
            CategoryList::Keyed { categories } | CategoryList::Bare(categories) => categories,
        })
    }
}
