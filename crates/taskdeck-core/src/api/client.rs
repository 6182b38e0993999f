//! HTTP client
//!
//! Thin wrapper over `reqwest` that builds requests against the configured
//! base URL, attaches the bearer token when a session is active, decodes
//! JSON bodies, and turns HTTP 401 into a global session teardown.
//!
//! The 401 path is the single place in the client that may end a session:
//! the store is cleared, a `SessionExpired` event is emitted for the
//! top-level controller, and the call fails with `ApiError::Unauthorized`.
//! The client itself performs no navigation.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::error::{ApiError, ApiResult};
use crate::session::SessionStore;

/// Events emitted by the API client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiEvent {
    /// A request came back 401; the session store has been cleared
    SessionExpired,
}

/// Client for the task-management REST backend
pub struct ApiClient {
    /// Underlying HTTP client
    http: reqwest::Client,
    /// Base URL, without trailing slash
    base_url: String,
    /// Session store consulted per request for the bearer token
    session: SessionStore,
    /// Event channel
    event_tx: mpsc::UnboundedSender<ApiEvent>,
    /// Event receiver, handed out once
    event_rx: Option<mpsc::UnboundedReceiver<ApiEvent>>,
}

impl ApiClient {
    /// Create a client for the given base URL and session store
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            http: reqwest::Client::new(),
            base_url,
            session,
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    /// The session store this client consults
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Take the event receiver (can only be called once)
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<ApiEvent>> {
        self.event_rx.take()
    }

    /// GET a JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(self.builder(Method::GET, path)).await
    }

    /// POST a JSON body, decoding a JSON response
    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.builder(Method::POST, path).json(body)).await
    }

    /// PATCH with a JSON body, decoding a JSON response
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.builder(Method::PATCH, path).json(body)).await
    }

    /// PATCH without a body (action endpoints like close/unassign)
    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(self.builder(Method::PATCH, path)).await
    }

    /// Build a request with the bearer header when a token exists
    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut builder = self.http.request(method, url);
        if let Some(token) = self.session.access() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send the request and decode the response
    ///
    /// An empty body decodes as JSON `null`, so no-content responses work
    /// for callers expecting `()` or an `Option`.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("Request returned 401, ending session");
            if let Err(e) = self.session.clear() {
                warn!("Failed to clear session: {:#}", e);
            }
            let _ = self.event_tx.send(ApiEvent::SessionExpired);
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Request failed with status {}: {}", status, body);
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let body = if text.is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}
