//! Account endpoints.

use tracing::instrument;

use super::{ApiClient, Payload};
use crate::error::ApiError;
use crate::forms::LoginRequest;
use crate::types::{LoginResponse, Outcome, SignupRequest};

impl ApiClient {
    /// Log in with email and password.
    ///
    /// The caller is responsible for storing the returned token and user in
    /// the session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` or `ApiError::Rejected` with the
    /// server's message when the credentials are wrong.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response: Payload<LoginResponse> = self.post("accounts/login/", request).await?;
        Ok(response.into_inner())
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the account, for example a
    /// duplicate email or a wrong secret key.
    #[instrument(skip_all, fields(username = %request.username, role = %request.role_name))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<Outcome, ApiError> {
        self.post("accounts/signup/", request).await
    }
}
