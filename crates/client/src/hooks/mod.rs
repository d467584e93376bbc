//! Data hooks: page-level state backed by the API.
//!
//! Every hook exposes its state through a `tokio::sync::watch` channel.
//! Each data slice is a [`Resource`] of `{data, loading, error}`; a fetch
//! raises `loading`, clears `error`, then stores the data or the
//! user-facing error message. Mutations call their endpoint and re-fetch
//! the slices they affect.
//!
//! A hook owns a [`CancelToken`] for its lifetime. Dropping the hook
//! cancels every request still in flight and no late response is written
//! into its state.

mod admin;
mod auth;
mod cart;
mod catalog;
mod delivery;
mod home;
mod orders;
mod plant_detail;
mod seller;

use std::future::Future;

use tokio::sync::watch;
use tracing::debug;

pub use admin::{AdminDashboardHook, AdminState};
pub use auth::{AuthContext, AuthState};
pub use cart::{CartHook, CartState};
pub use catalog::{CollectionState, PlantCollectionHook};
pub use delivery::{DeliveryAgentHook, DeliveryState};
pub use home::{HomeHook, HomeState};
pub use orders::{CustomerOrdersHook, OrdersState};
pub use plant_detail::{PlantDetailHook, PlantDetailState};
pub use seller::{SellerDashboardHook, SellerState};

use crate::api::ApiClient;
use crate::cancel::CancelToken;
use crate::error::ApiError;
use crate::forms::FormError;

/// One slice of hook state.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T: Default> Default for Resource<T> {
    fn default() -> Self {
        Self {
            data: T::default(),
            loading: false,
            error: None,
        }
    }
}

impl<T> Resource<T> {
    /// A slice that has not been fetched yet.
    pub(crate) fn pending() -> Self
    where
        T: Default,
    {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn settle(&mut self, result: Result<T, ApiError>, clear_on_error: bool)
    where
        T: Default,
    {
        self.loading = false;
        match result {
            Ok(data) => self.data = data,
            Err(e) => {
                if clear_on_error {
                    self.data = T::default();
                }
                self.error = Some(e.user_message());
            }
        }
    }
}

/// Lifetime scope shared by every hook: a cancellable API handle and the
/// state channel.
pub(crate) struct Scope<S> {
    api: ApiClient,
    state: watch::Sender<S>,
    cancel: CancelToken,
}

impl<S> Scope<S> {
    pub(crate) fn new(api: &ApiClient, initial: S) -> Self {
        let cancel = CancelToken::new();
        let (state, _) = watch::channel(initial);
        Self {
            api: api.scoped(cancel.clone()),
            state,
            cancel,
        }
    }

    pub(crate) const fn api(&self) -> &ApiClient {
        &self.api
    }

    pub(crate) fn snapshot(&self) -> S
    where
        S: Clone,
    {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.state.subscribe()
    }

    pub(crate) const fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub(crate) fn modify(&self, f: impl FnOnce(&mut S)) {
        if !self.cancel.is_cancelled() {
            self.state.send_modify(f);
        }
    }

    /// Fetch into `slice`, keeping stale data on failure.
    pub(crate) async fn load<T, L, F>(&self, slice: L, fetch: F)
    where
        T: Default,
        L: Fn(&mut S) -> &mut Resource<T>,
        F: Future<Output = Result<T, ApiError>>,
    {
        self.fetch_into(slice, fetch, false).await;
    }

    /// Fetch into `slice`, resetting it to its default on failure.
    pub(crate) async fn load_or_clear<T, L, F>(&self, slice: L, fetch: F)
    where
        T: Default,
        L: Fn(&mut S) -> &mut Resource<T>,
        F: Future<Output = Result<T, ApiError>>,
    {
        self.fetch_into(slice, fetch, true).await;
    }

    async fn fetch_into<T, L, F>(&self, slice: L, fetch: F, clear_on_error: bool)
    where
        T: Default,
        L: Fn(&mut S) -> &mut Resource<T>,
        F: Future<Output = Result<T, ApiError>>,
    {
        self.modify(|s| slice(s).begin());
        match fetch.await {
            Err(ApiError::Cancelled) => {
                debug!("Fetch cancelled, state left untouched");
                self.modify(|s| slice(s).loading = false);
            }
            result => self.modify(|s| slice(s).settle(result, clear_on_error)),
        }
    }
}

impl<S> Drop for Scope<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// The signed-in user's id, or a validation error for anonymous sessions.
pub(crate) fn require_user(api: &ApiClient) -> Result<greencart_core::UserId, ApiError> {
    api.session()
        .user_id()
        .ok_or(ApiError::Validation(FormError::NotSignedIn))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::session::Session;

    #[derive(Debug, Clone, Default)]
    struct Probe {
        items: Resource<Vec<u32>>,
    }

    fn scope() -> Scope<Probe> {
        let api = ApiClient::new(&ClientConfig::default(), Session::in_memory()).unwrap();
        Scope::new(&api, Probe::default())
    }

    #[tokio::test]
    async fn test_load_stores_data() {
        let scope = scope();
        scope.load(|s| &mut s.items, async { Ok(vec![1, 2]) }).await;
        let state = scope.snapshot();
        assert_eq!(state.items.data, vec![1, 2]);
        assert!(!state.items.loading);
        assert!(state.items.error.is_none());
    }

    #[tokio::test]
    async fn test_load_keeps_data_on_error() {
        let scope = scope();
        scope.load(|s| &mut s.items, async { Ok(vec![1]) }).await;
        scope
            .load(|s| &mut s.items, async { Err(ApiError::NotFound) })
            .await;
        let state = scope.snapshot();
        assert_eq!(state.items.data, vec![1]);
        assert_eq!(
            state.items.error.as_deref(),
            Some("The requested resource was not found.")
        );
    }

    #[tokio::test]
    async fn test_load_or_clear_resets_on_error() {
        let scope = scope();
        scope.load(|s| &mut s.items, async { Ok(vec![1]) }).await;
        scope
            .load_or_clear(|s| &mut s.items, async {
                Err(ApiError::Network("refused".into()))
            })
            .await;
        let state = scope.snapshot();
        assert!(state.items.data.is_empty());
        assert_eq!(
            state.items.error.as_deref(),
            Some("Network error. Please check your internet connection.")
        );
    }

    #[tokio::test]
    async fn test_cancelled_scope_ignores_writes() {
        let scope = scope();
        let rx = scope.subscribe();
        scope.cancel_token().cancel();
        scope.load(|s| &mut s.items, async { Ok(vec![9]) }).await;
        assert!(rx.borrow().items.data.is_empty());
        assert!(!rx.has_changed().unwrap());
    }
}
