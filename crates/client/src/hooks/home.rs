//! Landing page data.

use tokio::sync::watch;
use tracing::instrument;

use super::{Resource, Scope};
use crate::api::ApiClient;
use crate::cancel::CancelToken;
use crate::types::{Category, PlantSummary, SellerSummary};

/// Landing page state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeState {
    pub top_categories: Resource<Vec<Category>>,
    pub top_plants: Resource<Vec<PlantSummary>>,
    pub top_sellers: Resource<Vec<SellerSummary>>,
}

/// Landing page hook.
pub struct HomeHook {
    scope: Scope<HomeState>,
}

impl HomeHook {
    /// Create the hook and load all three lists.
    pub async fn mount(api: &ApiClient) -> Self {
        let hook = Self {
            scope: Scope::new(
                api,
                HomeState {
                    top_categories: Resource::pending(),
                    top_plants: Resource::pending(),
                    top_sellers: Resource::pending(),
                },
            ),
        };
        hook.refresh().await;
        hook
    }

    #[must_use]
    pub fn state(&self) -> HomeState {
        self.scope.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HomeState> {
        self.scope.subscribe()
    }

    #[must_use]
    pub const fn cancel_token(&self) -> &CancelToken {
        self.scope.cancel_token()
    }

    /// Re-fetch the three lists concurrently.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let api = self.scope.api();
        tokio::join!(
            self.scope
                .load(|s| &mut s.top_categories, api.top_categories()),
            self.scope.load(|s| &mut s.top_plants, api.top_plants()),
            self.scope.load(|s| &mut s.top_sellers, api.top_sellers()),
        );
    }
}
