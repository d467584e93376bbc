//! Subcommand implementations, one module per section of the shop.

pub mod account;
pub mod admin;
pub mod delivery;
pub mod orders;
pub mod seller;
pub mod shop;

use std::path::Path;

use greencart_client::routes::guard;
use greencart_client::types::ImageUpload;
use greencart_client::{ApiClient, Route};
use greencart_core::UserId;

use crate::error::{CliError, Result};
use crate::render;

/// Print where `path` lands for the current session.
pub fn route(api: &ApiClient, path: &str) {
    let requested = Route::parse(path);
    let landed = guard(requested.clone(), api.session());
    render::route(&requested, &landed);
}

/// Apply the route guard before showing a protected page.
///
/// Returns `false` after printing the redirect when access is denied.
pub fn enter(api: &ApiClient, route: Route) -> bool {
    let landed = guard(route.clone(), api.session());
    if landed == route {
        true
    } else {
        render::redirect(&landed);
        false
    }
}

/// ID of the signed-in user.
pub fn signed_in(api: &ApiClient) -> Result<UserId> {
    api.session().user_id().ok_or(CliError::NotSignedIn)
}

/// Read an image file for upload.
pub async fn read_image(path: &str) -> Result<ImageUpload> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CliError::File {
        path: path.to_string(),
        source,
    })?;
    let file_name = Path::new(path)
        .file_name()
        .map_or_else(|| path.to_string(), |n| n.to_string_lossy().into_owned());
    Ok(ImageUpload::new(file_name, bytes))
}

/// Read several image files for upload.
pub async fn read_images(paths: &[String]) -> Result<Vec<ImageUpload>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        images.push(read_image(path).await?);
    }
    Ok(images)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use greencart_client::{ClientConfig, Session};

    fn anonymous_api() -> ApiClient {
        let config = ClientConfig::with_base_url("http://127.0.0.1:9/api/").unwrap();
        ApiClient::new(&config, Session::in_memory()).unwrap()
    }

    #[test]
    fn test_anonymous_user_cannot_enter_dashboards() {
        let api = anonymous_api();
        assert!(!enter(&api, Route::parse("/admin")));
        assert!(enter(&api, Route::Home));
        assert!(matches!(signed_in(&api), Err(CliError::NotSignedIn)));
    }

    #[tokio::test]
    async fn test_missing_image_reports_path() {
        let err = read_image("/nonexistent/fern.png").await.unwrap_err();
        assert!(err.to_string().starts_with("Cannot read /nonexistent/fern.png"));
    }
}
