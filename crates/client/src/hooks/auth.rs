//! Authentication context: the signed-in user and the header counters.

use std::sync::{Arc, Weak};

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use super::{Scope, require_user};
use crate::api::ApiClient;
use crate::cancel::CancelToken;
use crate::error::ApiError;
use crate::forms::{LoginForm, SignupForm};
use crate::session::{Navigation, SessionError};
use crate::types::{ImageUpload, Outcome, ProfileUpdate, User};

/// Authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
    /// Lines in the cart.
    pub cart_count: usize,
    /// Orders not yet delivered.
    pub pending_orders: usize,
}

/// Authentication context.
///
/// Wraps the shared [`Session`](crate::Session): login and logout go
/// through here so the session, its persisted keys and this state stay in
/// step. A 401 seen by any other hook expires the session; the context
/// then resets to signed out.
pub struct AuthContext {
    scope: Arc<Scope<AuthState>>,
}

impl AuthContext {
    /// Create the context from whatever the session restored.
    ///
    /// Inside a tokio runtime a background task follows the session's
    /// navigation channel and publishes the reset to subscribers.
    #[must_use]
    pub fn mount(api: &ApiClient) -> Self {
        let user = api.session().user();
        let scope = Arc::new(Scope::new(
            api,
            AuthState {
                user,
                ..AuthState::default()
            },
        ));
        follow_expiry(&scope);
        Self { scope }
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.forget_expired_user();
        self.scope.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.forget_expired_user();
        self.scope.subscribe()
    }

    /// Reset the state if the session lost its user behind our back.
    fn forget_expired_user(&self) {
        let stale = self.scope.snapshot().user.is_some()
            && self.scope.api().session().user().is_none();
        if stale {
            self.scope.modify(|s| *s = AuthState::default());
        }
    }

    #[must_use]
    pub fn cancel_token(&self) -> &CancelToken {
        self.scope.cancel_token()
    }

    /// The signed-in user.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.scope.api().session().user()
    }

    /// Log in and store the token and user in the session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid form (no request is
    /// sent), otherwise the API error.
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn login(&self, form: &LoginForm) -> Result<User, ApiError> {
        let request = form.validate()?;
        self.scope.modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let response = match self.scope.api().login(&request).await {
            Ok(response) => response,
            Err(e) => {
                self.scope.modify(|s| {
                    s.loading = false;
                    s.error = Some(e.user_message());
                });
                return Err(e);
            }
        };

        let user = response.user;
        // Sessions without a bearer token are keyed by user id.
        let token = response.token.unwrap_or_else(|| user.user_id.to_string());
        if let Err(e) = self
            .scope
            .api()
            .session()
            .sign_in(SecretString::from(token), user.clone())
        {
            warn!(error = %e, "Failed to persist session");
        }
        info!(user_id = %user.user_id, role = %user.role, "Logged in");

        self.scope.modify(|s| {
            s.loading = false;
            s.user = Some(user.clone());
        });
        Ok(user)
    }

    /// Register a new account. The user still has to log in afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for mismatched passwords, a missing
    /// secret key or other form errors, without sending a request.
    #[instrument(skip_all, fields(username = %form.username, role = %form.role))]
    pub async fn signup(&self, form: &SignupForm) -> Result<Outcome, ApiError> {
        let request = form.validate()?;
        self.scope.modify(|s| {
            s.loading = true;
            s.error = None;
        });
        let result = self.scope.api().signup(&request).await;
        self.scope.modify(|s| {
            s.loading = false;
            s.error = result.as_ref().err().map(ApiError::user_message);
        });
        result
    }

    /// Forget the user and remove the persisted keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the session storage cannot be cleared. The
    /// in-memory state is reset regardless.
    pub fn logout(&self) -> Result<(), SessionError> {
        let result = self.scope.api().session().clear();
        self.scope.modify(|s| *s = AuthState::default());
        info!("Logged out");
        result
    }

    /// Update the signed-in user's profile, with an optional new picture.
    ///
    /// # Errors
    ///
    /// Returns the API error; the cached user is only changed on success.
    #[instrument(skip_all)]
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
        picture: Option<&ImageUpload>,
    ) -> Result<Outcome, ApiError> {
        let api = self.scope.api();
        let user_id = require_user(api)?;
        let outcome = api.update_profile(user_id, user_id, update, picture).await?;

        if let Some(mut user) = api.session().user() {
            update.apply_to(&mut user);
            if let Err(e) = api.session().update_user(user.clone()) {
                warn!(error = %e, "Failed to persist updated user");
            }
            self.scope.modify(|s| s.user = Some(user));
        }
        Ok(outcome)
    }

    /// Delete the signed-in user's account and sign out.
    ///
    /// # Errors
    ///
    /// Returns the API error; the session is kept on failure.
    #[instrument(skip_all)]
    pub async fn delete_account(&self) -> Result<Outcome, ApiError> {
        let api = self.scope.api();
        let user_id = require_user(api)?;
        let outcome = api.delete_user(user_id, user_id).await?;
        if let Err(e) = self.logout() {
            warn!(error = %e, "Failed to clear session after account deletion");
        }
        Ok(outcome)
    }

    /// Recompute the cart and pending-order counters shown in the header.
    ///
    /// Failed lookups leave their counter as it was.
    #[instrument(skip(self))]
    pub async fn refresh_counts(&self) {
        let api = self.scope.api();
        let Some(user_id) = api.session().user_id() else {
            self.scope.modify(|s| {
                s.cart_count = 0;
                s.pending_orders = 0;
            });
            return;
        };

        let (cart, orders) = tokio::join!(api.cart(user_id), api.customer_orders(user_id, None));
        self.scope.modify(|s| {
            if let Ok(cart) = &cart {
                s.cart_count = cart.len();
            }
            if let Ok(orders) = &orders {
                s.pending_orders = orders.iter().filter(|o| o.order_status.is_open()).count();
            }
        });
    }
}

/// Reset `scope` to signed out whenever the session asks for the login page.
fn follow_expiry(scope: &Arc<Scope<AuthState>>) {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        return;
    };
    let mut navigation = scope.api().session().navigation();
    let cancel = scope.cancel_token().clone();
    let scope: Weak<Scope<AuthState>> = Arc::downgrade(scope);
    runtime.spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                changed = navigation.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            let expired = *navigation.borrow_and_update() == Navigation::Login;
            if expired {
                let Some(scope) = scope.upgrade() else { break };
                scope.modify(|s| *s = AuthState::default());
            }
        }
    });
}
