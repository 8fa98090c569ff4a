//! API gateway client for the CMS REST API.
//!
//! Every backend call goes through [`ApiClient::dispatch`], which wraps the
//! base transport call with the two cross-cutting policies: attach the stored
//! bearer token on the way out, expire the session on a 401 on the way back.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::{header, Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{ApiError, ApiResult};
use super::params::ListParams;
use super::resources::{
    AnalyticsApi, AuthApi, CategoriesApi, CommentsApi, PlaylistsApi, SettingsApi,
    SubscriptionsApi, TagsApi, UsersApi, VideosApi,
};
use crate::auth::{
    CredentialStore, Navigator, PersistedCredentials, SessionHandle, AUTH_TOKEN_KEY, LOGIN_ROUTE,
};

/// HTTP request timeout in seconds.
/// Bounds a hung request so callers never wait forever.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Clone is cheap - reqwest::Client and the shared handles are all Arc-backed.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    base: Url,
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    session: SessionHandle,
}

impl ApiClient {
    /// Create a client with the default request timeout
    pub fn new(
        base_url: &str,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        Self::with_timeout(
            base_url,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            store,
            navigator,
        )
    }

    pub fn with_timeout(
        base_url: &str,
        timeout: Duration,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let base_url = base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if base.cannot_be_a_base() {
            bail!("API base URL cannot carry a path: {}", base_url);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            base,
            store,
            navigator,
            session: SessionHandle::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session state shared with the session manager
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    // ===== Resource forwarders =====

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn videos(&self) -> VideosApi<'_> {
        VideosApi::new(self)
    }

    pub fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi::new(self)
    }

    pub fn tags(&self) -> TagsApi<'_> {
        TagsApi::new(self)
    }

    pub fn playlists(&self) -> PlaylistsApi<'_> {
        PlaylistsApi::new(self)
    }

    pub fn comments(&self) -> CommentsApi<'_> {
        CommentsApi::new(self)
    }

    pub fn subscriptions(&self) -> SubscriptionsApi<'_> {
        SubscriptionsApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn settings(&self) -> SettingsApi<'_> {
        SettingsApi::new(self)
    }

    pub fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi::new(self)
    }

    // ===== Gateway =====

    /// Base URL with `segments` appended, each percent-encoded on its own so
    /// an id can never add path levels or a query.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.client.request(method, self.url(segments))
    }

    /// Read the durable token on every call so a login or logout elsewhere is
    /// picked up immediately.
    fn auth_headers(&self) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        let token = match self.store.get(AUTH_TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read stored token, sending request without it");
                None
            }
        };
        if let Some(token) = token {
            match header::HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(header::AUTHORIZATION, value);
                }
                Err(_) => warn!("Stored token is not a valid header value, ignoring it"),
            }
        }
        headers
    }

    /// Clear durable credentials and in-memory session, then send the front
    /// end to the login route.
    fn expire_session(&self) {
        warn!("Backend rejected the session, logging out");
        if let Err(e) = PersistedCredentials::clear(self.store.as_ref()) {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        self.session.write().clear();
        self.navigator.navigate(LOGIN_ROUTE);
    }

    /// Send a request through the gateway policies and return the JSON body.
    ///
    /// Empty success bodies come back as `Value::Null`.
    pub async fn dispatch(&self, request: RequestBuilder) -> ApiResult<Value> {
        let request = request.headers(self.auth_headers());
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "Response received");

        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("Body is not JSON: {}", e)))
    }

    pub(crate) async fn get(&self, segments: &[&str]) -> ApiResult<Value> {
        self.dispatch(self.request(Method::GET, segments)).await
    }

    pub(crate) async fn get_query<Q: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &Q,
    ) -> ApiResult<Value> {
        self.dispatch(self.request(Method::GET, segments).query(query))
            .await
    }

    pub(crate) async fn get_list(&self, segments: &[&str], params: &ListParams) -> ApiResult<Value> {
        if params.is_empty() {
            return self.get(segments).await;
        }
        self.get_query(segments, &params.to_query()).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ApiResult<Value> {
        self.dispatch(self.request(Method::POST, segments).json(body))
            .await
    }

    pub(crate) async fn put<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ApiResult<Value> {
        self.dispatch(self.request(Method::PUT, segments).json(body))
            .await
    }

    pub(crate) async fn delete(&self, segments: &[&str]) -> ApiResult<Value> {
        self.dispatch(self.request(Method::DELETE, segments)).await
    }

    pub(crate) async fn post_multipart(
        &self,
        segments: &[&str],
        form: reqwest::multipart::Form,
    ) -> ApiResult<Value> {
        self.dispatch(self.request(Method::POST, segments).multipart(form))
            .await
    }
}
