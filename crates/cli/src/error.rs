//! CLI errors and Sentry context helpers.

use greencart_client::{ApiError, ConfigError, FormError, SessionError};
use thiserror::Error;

/// Errors a command can end with.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The session store could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The API call failed. Displayed with the user-facing message.
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    /// A local file (image upload) could not be read.
    #[error("Cannot read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A command needs a signed-in user.
    #[error("Not signed in. Run `greencart login` first.")]
    NotSignedIn,
}

impl From<FormError> for CliError {
    fn from(err: FormError) -> Self {
        Self::Api(ApiError::Validation(err))
    }
}

impl CliError {
    /// Whether the failure means the session is gone.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Associate subsequent Sentry events with a user.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Stop associating Sentry events with a user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Record a user action as a Sentry breadcrumb.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };
    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }
    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_errors_display_user_message() {
        let err = CliError::from(ApiError::Forbidden);
        assert_eq!(
            err.to_string(),
            "You do not have permission to perform this action."
        );
        assert!(CliError::from(ApiError::Unauthorized).is_unauthorized());
        assert!(!CliError::NotSignedIn.is_unauthorized());
    }

    #[test]
    fn test_form_errors_wrap_as_validation() {
        let err = CliError::from(FormError::PasswordMismatch);
        assert_eq!(err.to_string(), "Passwords do not match");
    }
}
