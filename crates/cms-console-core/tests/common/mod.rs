#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use cms_console_core::auth::{
    CredentialStore, MemoryCredentialStore, RecordingNavigator, AUTH_TOKEN_KEY, USER_KEY,
};
use cms_console_core::{ApiClient, SessionManager};
use serde_json::{json, Value};
use wiremock::{Match, MockServer, Request};

/// Memory store that counts how often the token entry is removed.
#[derive(Debug, Clone, Default)]
pub struct CountingStore {
    inner: MemoryCredentialStore,
    token_removals: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn token_removals(&self) -> usize {
        self.token_removals.load(Ordering::SeqCst)
    }
}

impl CredentialStore for CountingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        if key == AUTH_TOKEN_KEY && self.inner.get(key)?.is_some() {
            self.token_removals.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.remove(key)
    }
}

/// Matches requests that carry no Authorization header.
pub struct NoAuthorization;

impl Match for NoAuthorization {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("authorization")
    }
}

pub struct Harness {
    pub server: MockServer,
    pub store: CountingStore,
    pub navigator: RecordingNavigator,
    pub manager: SessionManager,
}

impl Harness {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let store = CountingStore::default();
        let navigator = RecordingNavigator::new();
        let api = ApiClient::new(
            &format!("{}/api", server.uri()),
            Arc::new(store.clone()),
            Arc::new(navigator.clone()),
        )
        .expect("Failed to build API client");

        Self {
            server,
            store,
            navigator,
            manager: SessionManager::new(api),
        }
    }

    pub fn api(&self) -> &ApiClient {
        self.manager.api()
    }

    pub fn persist(&self, token: &str, user: &str) {
        self.store.set(AUTH_TOKEN_KEY, token).unwrap();
        self.store.set(USER_KEY, user).unwrap();
    }

    pub fn stored_token(&self) -> Option<String> {
        self.store.get(AUTH_TOKEN_KEY).unwrap()
    }

    pub fn stored_user(&self) -> Option<String> {
        self.store.get(USER_KEY).unwrap()
    }
}

pub fn admin_user() -> Value {
    json!({
        "id": 1,
        "username": "admin",
        "email": "admin@example.com",
        "provider": "local",
        "confirmed": true,
        "blocked": false
    })
}

pub fn auth_body(jwt: &str) -> Value {
    json!({ "jwt": jwt, "user": admin_user() })
}

pub fn strapi_error(status: u16, message: &str) -> Value {
    json!({
        "data": null,
        "error": { "status": status, "name": "ValidationError", "message": message, "details": {} }
    })
}
