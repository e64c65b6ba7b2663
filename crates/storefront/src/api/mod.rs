//! REST API client.
//!
//! # Architecture
//!
//! - One `reqwest::Client` per process, shared by the storefront and admin layers
//! - JSON request/response bodies, endpoint paths joined onto the configured base URL
//! - Bearer token read from the persistent store on every request
//! - Any HTTP 401 invalidates the session globally: the credential keys are
//!   removed from the store and [`SessionEvent::Expired`] is broadcast to
//!   subscribers, whoever issued the failing call
//!
//! # Example
//!
//! ```rust,ignore
//! use dokan_storefront::api::ApiClient;
//!
//! let api = ApiClient::new(&config.api, store.clone())?;
//! let mut events = api.subscribe();
//! let profile: ProfileResponse = api.get("auth/profile", &[]).await?;
//! ```

pub mod auth;

pub use auth::{AuthApi, AuthResponse};

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::models::storage_keys;
use crate::storage::{KeyValueStore, StorageError, StoreExt};

/// Capacity of the session event channel.
const SESSION_EVENT_CAPACITY: usize = 16;

/// Errors returned by [`ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connection refused, timeout, TLS failure).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the bearer token. The session has already been
    /// cleared from the store.
    #[error("Unauthorized: session expired")]
    Unauthorized,

    /// The server answered with a non-success status.
    #[error("API error: {status} - {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        /// `message` field of the error body, usually Persian text.
        message: Option<String>,
    },

    /// A success response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Decode(String),

    /// An endpoint path could not be joined onto the base URL.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The bearer token could not be read from the store.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Message provided by the server, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// Text to show a user: the server message, else `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// HTTP status of a server-reported error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            _ => None,
        }
    }
}

/// Session lifecycle notifications published by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A request was rejected with 401; the user must log in again at `redirect_to`.
    Expired { redirect_to: String },
}

/// Error body shape used by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the shop REST API.
///
/// Cheaply cloneable; all clones share the HTTP connection pool, the store
/// and the session event channel.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    login_path: String,
    store: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                login_path: config.login_path.clone(),
                store,
                events,
            }),
        })
    }

    /// Subscribe to session lifecycle events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// The store the client reads tokens from.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner.store
    }

    /// Build the absolute URL for an endpoint path and query pairs.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if `path` cannot be joined.
    pub fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    // =========================================================================
    // Request helpers
    // =========================================================================

    /// GET a JSON resource.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, query)?;
        let request = self.request(Method::GET, url, None)?;
        self.send_json(request).await
    }

    /// GET a JSON resource with an explicit bearer token instead of the stored one.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SecretString,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, &[])?;
        let request = self.request(Method::GET, url, Some(token))?;
        self.send_json(request).await
    }

    /// POST a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, &[])?;
        let request = self.request(Method::POST, url, None)?.json(body);
        self.send_json(request).await
    }

    /// PUT a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, &[])?;
        let request = self.request(Method::PUT, url, None)?.json(body);
        self.send_json(request).await
    }

    /// POST a JSON body, ignoring any response body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post_discard<B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(path, &[])?;
        let request = self.request(Method::POST, url, None)?.json(body);
        self.send(request).await.map(drop)
    }

    /// PATCH without a body, ignoring any response body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn patch(&self, path: &str) -> Result<(), ApiError> {
        let url = self.endpoint(path, &[])?;
        let request = self.request(Method::PATCH, url, None)?;
        self.send(request).await.map(drop)
    }

    /// DELETE a resource, ignoring any response body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.endpoint(path, &[])?;
        let request = self.request(Method::DELETE, url, None)?;
        self.send(request).await.map(drop)
    }

    /// GET a binary payload (CSV/PDF exports).
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get_bytes(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(path, query)?;
        let request = self.request(Method::GET, url, None)?;
        let response = self.send(request).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Start a request, attaching the bearer header when a token is known.
    fn request(
        &self,
        method: Method,
        url: Url,
        token: Option<&SecretString>,
    ) -> Result<RequestBuilder, ApiError> {
        let builder = self.inner.client.request(method, url);
        if let Some(token) = token {
            return Ok(builder.bearer_auth(token.expose_secret()));
        }
        match self.stored_token()? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    /// Storefront token, else admin token.
    fn stored_token(&self) -> Result<Option<String>, ApiError> {
        let store = &self.inner.store;
        if let Some(token) = store.get(storage_keys::TOKEN)? {
            return Ok(Some(token));
        }
        Ok(store.get(storage_keys::ADMIN_TOKEN)?)
    }

    #[instrument(skip(self, request))]
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(status = %status, url = %response.url(), "API response");

        if status == StatusCode::UNAUTHORIZED {
            self.invalidate_session();
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            return Err(Self::parse_error(response).await);
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Decode(e.to_string())
        })
    }

    /// Parse an error response body.
    async fn parse_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message.or(body.error));
        ApiError::Server { status, message }
    }

    /// Clear every credential key and tell subscribers to go to the login view.
    fn invalidate_session(&self) {
        warn!("API rejected the session token, clearing stored credentials");
        if let Err(e) = self.inner.store.remove_all(&storage_keys::SESSION_KEYS) {
            tracing::error!(error = %e, "Failed to clear session from store");
        }
        // No subscribers is fine
        let _ = self.inner.events.send(SessionEvent::Expired {
            redirect_to: self.inner.login_path.clone(),
        });
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("login_path", &self.inner.login_path)
            .finish_non_exhaustive()
    }
}
