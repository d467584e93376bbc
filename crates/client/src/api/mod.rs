//! GreenCart REST API client.
//!
//! All endpoint groups hang off [`ApiClient`] as inherent methods, one
//! module per group. Requests share a single `reqwest::Client` and go
//! through [`ApiClient::execute`], which:
//!
//! - attaches `Authorization: <scheme> <token>` when the session holds a token
//! - tags the request with a fresh `X-Request-Id`
//! - races the request against the client's [`CancelToken`], if scoped
//! - normalises the response envelope (see [`envelope`])
//! - expires the session on HTTP 401

mod admin;
mod auth;
mod cart;
mod catalog;
mod delivery;
pub(crate) mod envelope;
mod home;
mod orders;
mod plant_detail;
mod profile;
mod seller;

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::Session;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client for the GreenCart REST API.
///
/// Cheap to clone; clones share the connection pool and session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
    cancel: Option<CancelToken>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
    auth_scheme: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("session", &self.inner.session)
            .field("scoped", &self.cancel.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client bound to `session`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(concat!("greencart-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.clone(),
                session,
                auth_scheme: config.auth_scheme.clone(),
            }),
            cancel: None,
        })
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Base URL all paths are joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// A clone whose requests abort when `token` is cancelled.
    #[must_use]
    pub fn scoped(&self, token: CancelToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cancel: Some(token),
        }
    }

    /// The cancel token this client is scoped to, if any.
    #[must_use]
    pub const fn cancel_token(&self) -> Option<&CancelToken> {
        self.cancel.as_ref()
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Network(format!("Invalid request path {path}: {e}")))
    }

    /// URL for `segments` under the base path, each segment percent-encoded
    /// on its own and the path ending in `/`.
    fn segment_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if segments.iter().any(|s| matches!(*s, "" | "." | "..")) {
            return Err(ApiError::NotFound);
        }
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::Network(format!(
                    "Base URL {} cannot carry a path",
                    self.inner.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    /// Execute a GET request and decode the normalised payload.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.inner.http.get(self.url(path)?);
        decode(self.execute(request, "GET", path).await?)
    }

    /// Execute a GET request whose path includes caller-supplied segments.
    pub(crate) async fn get_segments<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, ApiError> {
        let url = self.segment_url(segments)?;
        let path = url.path().to_string();
        let request = self.inner.http.get(url);
        decode(self.execute(request, "GET", &path).await?)
    }

    /// Execute a GET request with query parameters.
    pub(crate) async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.inner.http.get(self.url(path)?).query(query);
        decode(self.execute(request, "GET", path).await?)
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.inner.http.post(self.url(path)?).json(body);
        decode(self.execute(request, "POST", path).await?)
    }

    /// Execute a POST request with a multipart body.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let request = self.inner.http.post(self.url(path)?).multipart(form);
        decode(self.execute(request, "POST", path).await?)
    }

    #[instrument(skip(self, request), fields(request_id))]
    async fn execute(
        &self,
        mut request: reqwest::RequestBuilder,
        method: &'static str,
        path: &str,
    ) -> Result<Value, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());
        request = request.header(REQUEST_ID_HEADER, &request_id);

        if let Some(token) = self.inner.session.token() {
            let value = format!("{} {}", self.inner.auth_scheme, token.expose_secret());
            let mut header = HeaderValue::from_str(&value)
                .map_err(|_| ApiError::Network("Session token is not a valid header".into()))?;
            header.set_sensitive(true);
            request = request.header(AUTHORIZATION, header);
        }

        let send = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, ApiError>((status, body))
        };
        let (status, body) = match &self.cancel {
            Some(token) => token.run(send).await?,
            None => send.await?,
        };
        debug!(status, bytes = body.len(), "Response received");

        match envelope::normalize(status, &body) {
            Err(ApiError::Unauthorized) => {
                warn!(status, "Request unauthorized, expiring session");
                self.inner.session.expire();
                Err(ApiError::Unauthorized)
            }
            other => other,
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// A payload under `data`, or the body itself when it is not enveloped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Payload<T> {
    Enveloped { data: T },
    Bare(T),
}

impl<T> Payload<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Enveloped { data } | Self::Bare(data) => data,
        }
    }
}

/// Multipart part for an uploaded image.
pub(crate) fn image_part(
    image: &crate::types::ImageUpload,
) -> Result<reqwest::multipart::Part, ApiError> {
    reqwest::multipart::Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.mime)
        .map_err(|e| ApiError::Network(format!("Invalid image type {}: {e}", image.mime)))
}
