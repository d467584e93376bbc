//! Plant collection page: one category, or a search over every plant.

use tokio::sync::watch;
use tracing::instrument;

use super::{Resource, Scope};
use crate::api::ApiClient;
use crate::cancel::CancelToken;
use crate::types::{Category, PlantSummary};

/// Plant collection state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionState {
    /// Category slug being browsed, `None` for search.
    pub category: Option<String>,
    /// Last search query.
    pub query: String,
    pub plants: Resource<Vec<PlantSummary>>,
    pub all_categories: Resource<Vec<Category>>,
}

/// Plant collection hook.
pub struct PlantCollectionHook {
    scope: Scope<CollectionState>,
}

impl PlantCollectionHook {
    /// Create the hook for a category slug, or for all plants when `None`.
    pub async fn mount(api: &ApiClient, category: Option<&str>) -> Self {
        let hook = Self {
            scope: Scope::new(
                api,
                CollectionState {
                    category: category.map(str::to_string),
                    plants: Resource::pending(),
                    all_categories: Resource::pending(),
                    ..CollectionState::default()
                },
            ),
        };
        hook.refresh().await;
        hook
    }

    #[must_use]
    pub fn state(&self) -> CollectionState {
        self.scope.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CollectionState> {
        self.scope.subscribe()
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancelToken {
        self.scope.cancel_token()
    }

    /// Re-fetch the plants and the category list.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let api = self.scope.api();
        let (category, query) = {
            let state = self.scope.snapshot();
            (state.category, state.query)
        };
        let plants = async {
            match &category {
                Some(slug) => api.plants_by_category(slug).await,
                None => api.search_plants(&query).await,
            }
        };
        tokio::join!(
            self.scope.load(|s| &mut s.plants, plants),
            self.scope
                .load(|s| &mut s.all_categories, api.all_categories()),
        );
    }

    /// Search all plants. Leaves the category view.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) {
        self.scope.modify(|s| {
            s.category = None;
            query.trim().clone_into(&mut s.query);
        });
        let query = query.trim().to_string();
        self.scope
            .load(|s| &mut s.plants, self.scope.api().search_plants(&query))
            .await;
    }

    /// Switch to another category.
    #[instrument(skip(self))]
    pub async fn select_category(&self, slug: &str) {
        self.scope.modify(|s| {
            s.category = Some(slug.to_string());
            s.query.clear();
        });
        self.scope
            .load(
                |s| &mut s.plants,
                self.scope.api().plants_by_category(slug),
            )
            .await;
    }
}
