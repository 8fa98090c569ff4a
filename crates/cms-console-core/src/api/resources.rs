//! Resource forwarders.
//!
//! Each method maps one-to-one onto an HTTP verb and path and returns the
//! response body unmodified. Error handling is entirely the gateway's.

use serde_json::{json, Value};

use super::client::ApiClient;
use super::error::ApiResult;
use super::params::ListParams;
use crate::models::{ModerationDecision, ViewsPeriod};

/// Shared list/get/create/update/delete shape of a collection type.
/// Create and update payloads are wrapped as `{"data": ...}`.
struct Collection<'a> {
    client: &'a ApiClient,
    path: &'static str,
}

impl<'a> Collection<'a> {
    async fn list(&self, params: &ListParams) -> ApiResult<Value> {
        self.client.get_list(&[self.path], params).await
    }

    async fn get(&self, id: &str) -> ApiResult<Value> {
        self.client.get(&[self.path, id]).await
    }

    async fn get_populated(&self, id: &str) -> ApiResult<Value> {
        self.client
            .get_list(&[self.path, id], &ListParams::new().populate("*"))
            .await
    }

    async fn create(&self, data: &Value) -> ApiResult<Value> {
        self.client.post(&[self.path], &json!({ "data": data })).await
    }

    async fn update(&self, id: &str, data: &Value) -> ApiResult<Value> {
        self.client
            .put(&[self.path, id], &json!({ "data": data }))
            .await
    }

    async fn delete(&self, id: &str) -> ApiResult<Value> {
        self.client.delete(&[self.path, id]).await
    }
}

// ============================================================================
// Auth
// ============================================================================

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Returns `{"jwt": ..., "user": {...}}` on success
    pub async fn login(&self, identifier: &str, password: &str) -> ApiResult<Value> {
        let body = json!({ "identifier": identifier, "password": password });
        self.client.post(&["auth", "local"], &body).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> ApiResult<Value> {
        let body = json!({ "username": username, "email": email, "password": password });
        self.client.post(&["auth", "local", "register"], &body).await
    }

    /// Current user for the attached token
    pub async fn me(&self) -> ApiResult<Value> {
        self.client.get(&["users", "me"]).await
    }

    pub async fn forgot_password(&self, email: &str) -> ApiResult<Value> {
        self.client
            .post(&["auth", "forgot-password"], &json!({ "email": email }))
            .await
    }
}

// ============================================================================
// Videos
// ============================================================================

pub struct VideosApi<'a> {
    inner: Collection<'a>,
}

impl<'a> VideosApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self {
            inner: Collection { client, path: "videos" },
        }
    }

    pub async fn list(&self, params: &ListParams) -> ApiResult<Value> {
        self.inner.list(params).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Value> {
        self.inner.get_populated(id).await
    }

    pub async fn create(&self, data: &Value) -> ApiResult<Value> {
        self.inner.create(data).await
    }

    pub async fn update(&self, id: &str, data: &Value) -> ApiResult<Value> {
        self.inner.update(id, data).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Value> {
        self.inner.delete(id).await
    }

    /// Upload a media file (thumbnail or video) to the media library.
    ///
    /// The caller reads the file; `file_name` is what the library stores.
    pub async fn upload_file(&self, file_name: &str, bytes: Vec<u8>) -> ApiResult<Value> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("files", part);
        self.inner.client.post_multipart(&["upload"], form).await
    }
}

// ============================================================================
// Categories, tags, playlists
// ============================================================================

pub struct CategoriesApi<'a> {
    inner: Collection<'a>,
}

impl<'a> CategoriesApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self {
            inner: Collection { client, path: "categories" },
        }
    }

    pub async fn list(&self) -> ApiResult<Value> {
        self.inner.list(&ListParams::default()).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Value> {
        self.inner.get(id).await
    }

    pub async fn create(&self, data: &Value) -> ApiResult<Value> {
        self.inner.create(data).await
    }

    pub async fn update(&self, id: &str, data: &Value) -> ApiResult<Value> {
        self.inner.update(id, data).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Value> {
        self.inner.delete(id).await
    }
}

pub struct TagsApi<'a> {
    inner: Collection<'a>,
}

impl<'a> TagsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self {
            inner: Collection { client, path: "tags" },
        }
    }

    pub async fn list(&self) -> ApiResult<Value> {
        self.inner.list(&ListParams::default()).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Value> {
        self.inner.get(id).await
    }

    pub async fn create(&self, data: &Value) -> ApiResult<Value> {
        self.inner.create(data).await
    }

    pub async fn update(&self, id: &str, data: &Value) -> ApiResult<Value> {
        self.inner.update(id, data).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Value> {
        self.inner.delete(id).await
    }
}

pub struct PlaylistsApi<'a> {
    inner: Collection<'a>,
}

impl<'a> PlaylistsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self {
            inner: Collection { client, path: "playlists" },
        }
    }

    pub async fn list(&self) -> ApiResult<Value> {
        self.inner.list(&ListParams::new().populate("*")).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Value> {
        self.inner.get_populated(id).await
    }

    pub async fn create(&self, data: &Value) -> ApiResult<Value> {
        self.inner.create(data).await
    }

    pub async fn update(&self, id: &str, data: &Value) -> ApiResult<Value> {
        self.inner.update(id, data).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Value> {
        self.inner.delete(id).await
    }
}

// ============================================================================
// Comments
// ============================================================================

pub struct CommentsApi<'a> {
    inner: Collection<'a>,
}

impl<'a> CommentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self {
            inner: Collection { client, path: "comments" },
        }
    }

    pub async fn list(&self, params: &ListParams) -> ApiResult<Value> {
        self.inner.list(params).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Value> {
        self.inner.get_populated(id).await
    }

    pub async fn update(&self, id: &str, data: &Value) -> ApiResult<Value> {
        self.inner.update(id, data).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Value> {
        self.inner.delete(id).await
    }

    pub async fn moderate(&self, id: &str, decision: ModerationDecision) -> ApiResult<Value> {
        self.inner
            .update(id, &json!({ "status": decision.status().as_str() }))
            .await
    }
}

// ============================================================================
// Subscriptions, users
// ============================================================================

pub struct SubscriptionsApi<'a> {
    inner: Collection<'a>,
}

impl<'a> SubscriptionsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self {
            inner: Collection { client, path: "subscriptions" },
        }
    }

    pub async fn list(&self) -> ApiResult<Value> {
        self.inner.list(&ListParams::default()).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Value> {
        self.inner.delete(id).await
    }
}

/// The users-permissions plugin takes user updates unwrapped.
pub struct UsersApi<'a> {
    inner: Collection<'a>,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self {
            inner: Collection { client, path: "users" },
        }
    }

    pub async fn list(&self) -> ApiResult<Value> {
        self.inner.list(&ListParams::default()).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Value> {
        self.inner.get(id).await
    }

    pub async fn update(&self, id: &str, data: &Value) -> ApiResult<Value> {
        self.inner.client.put(&[self.inner.path, id], data).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Value> {
        self.inner.delete(id).await
    }
}

// ============================================================================
// Settings, analytics
// ============================================================================

pub struct SettingsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SettingsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> ApiResult<Value> {
        self.client
            .get_list(&["setting"], &ListParams::new().populate("*"))
            .await
    }

    pub async fn update(&self, data: &Value) -> ApiResult<Value> {
        self.client.put(&["setting"], &json!({ "data": data })).await
    }
}

pub struct AnalyticsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AnalyticsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> ApiResult<Value> {
        self.client.get(&["analytics", "stats"]).await
    }

    pub async fn views(&self, period: ViewsPeriod) -> ApiResult<Value> {
        self.client
            .get_query(&["analytics", "views"], &[("period", period.as_str())])
            .await
    }
}
