//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `GREENCART_API_BASE_URL` - REST API base URL (default: `http://localhost:8000`)
//! - `GREENCART_SESSION_FILE` - Path of the persisted session (default: in-memory only)
//! - `GREENCART_HTTP_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `GREENCART_AUTH_SCHEME` - `Authorization` header scheme (default: `Token`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::session::{FileStorage, MemoryStorage, SessionStorage};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_AUTH_SCHEME: &str = "Token";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Session storage error: {0}")]
    Storage(String),
}

/// GreenCart client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST API base URL, always ending in `/`
    pub base_url: Url,
    /// Where the session is persisted; `None` keeps it in memory
    pub session_file: Option<PathBuf>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Scheme placed before the token in the `Authorization` header
    pub auth_scheme: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: normalize_base_url(DEFAULT_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default base URL is valid")),
            session_file: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_env_or_default("GREENCART_API_BASE_URL", DEFAULT_BASE_URL);
        let base_url = normalize_base_url(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("GREENCART_API_BASE_URL".to_string(), e)
        })?;

        let timeout_secs = get_env_or_default(
            "GREENCART_HTTP_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("GREENCART_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "GREENCART_HTTP_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            session_file: get_optional_env("GREENCART_SESSION_FILE").map(PathBuf::from),
            timeout: Duration::from_secs(timeout_secs),
            auth_scheme: get_env_or_default("GREENCART_AUTH_SCHEME", DEFAULT_AUTH_SCHEME),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration pointing at an explicit base URL, other fields defaulted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL cannot be parsed.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("base_url".to_string(), e))?;
        Ok(Self {
            base_url,
            ..Self::default()
        })
    }

    /// Build the session storage backend this configuration selects.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Storage` if the session file's directory cannot be created.
    pub fn storage(&self) -> Result<Arc<dyn SessionStorage>, ConfigError> {
        match &self.session_file {
            Some(path) => FileStorage::new(path.clone())
                .map(|s| Arc::new(s) as Arc<dyn SessionStorage>)
                .map_err(|e| ConfigError::Storage(e.to_string())),
            None => Ok(Arc::new(MemoryStorage::default())),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a base URL and make sure relative joins land beneath its path.
fn normalize_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
