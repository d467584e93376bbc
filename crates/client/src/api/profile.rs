//! Profile endpoints.

use greencart_core::UserId;
use reqwest::multipart::Form;
use tracing::instrument;

use super::{ApiClient, Payload, image_part};
use crate::error::ApiError;
use crate::types::{ImageUpload, Outcome, Profile, ProfileUpdate};

impl ApiClient {
    /// Fetch a user's profile.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn profile(&self, user_id: UserId) -> Result<Profile, ApiError> {
        let response: Payload<Profile> = self.get(&format!("user/profile/{user_id}/")).await?;
        Ok(response.into_inner())
    }

    /// Update a profile on behalf of `requestor_id`.
    ///
    /// Sent as JSON unless a new picture is attached, in which case the
    /// body is multipart with the picture under `profile_image`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, update, picture), fields(requestor_id = %requestor_id, user_id = %user_id))]
    pub async fn update_profile(
        &self,
        requestor_id: UserId,
        user_id: UserId,
        update: &ProfileUpdate,
        picture: Option<&ImageUpload>,
    ) -> Result<Outcome, ApiError> {
        let path = format!("user/update/{requestor_id}/{user_id}/");
        match picture {
            None => self.post(&path, update).await,
            Some(picture) => {
                let form = update
                    .form_fields()
                    .into_iter()
                    .fold(Form::new(), |form, (name, value)| form.text(name, value))
                    .part("profile_image", image_part(picture)?);
                self.post_multipart(&path, form).await
            }
        }
    }

    /// Delete a user account on behalf of `requestor_id`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(requestor_id = %requestor_id, user_id = %user_id))]
    pub async fn delete_user(
        &self,
        requestor_id: UserId,
        user_id: UserId,
    ) -> Result<Outcome, ApiError> {
        self.post(
            &format!("user/delete/{requestor_id}/{user_id}/"),
            &serde_json::json!({}),
        )
        .await
    }
}
