//! Session manager: the single authority for "is the caller authenticated".

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::session::{SessionHandle, SessionState};
use super::store::PersistedCredentials;
use crate::api::{ApiClient, ApiError};
use crate::models::User;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Another login or session restore is already in progress")]
    Busy,

    #[error(transparent)]
    Rejected(#[from] ApiError),

    #[error("Malformed authentication response: {0}")]
    MalformedResponse(String),

    #[error("Failed to persist credentials: {0:#}")]
    Storage(anyhow::Error),
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    jwt: String,
    user: User,
}

/// Raises a flag for its lifetime; lowered on drop whatever the outcome.
struct FlagGuard<'a>(&'a AtomicBool);

impl<'a> FlagGuard<'a> {
    /// Fails if the flag is already raised.
    fn try_raise(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SessionManager {
    api: ApiClient,
    session: SessionHandle,
    loading: AtomicBool,
    restoring: AtomicBool,
}

impl SessionManager {
    pub fn new(api: ApiClient) -> Self {
        let session = api.session().clone();
        Self {
            api,
            session,
            loading: AtomicBool::new(false),
            restoring: AtomicBool::new(false),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    pub fn state(&self) -> SessionState {
        if self.restoring.load(Ordering::Acquire) {
            SessionState::Restoring
        } else if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    /// True while a login, registration or restore is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn user(&self) -> Option<User> {
        self.session.read().user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.session.read().token().map(str::to_string)
    }

    fn begin(&self) -> Result<FlagGuard<'_>, AuthError> {
        FlagGuard::try_raise(&self.loading).ok_or(AuthError::Busy)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Authenticate with identifier (username or email) and password.
    ///
    /// On failure the previous session is left exactly as it was.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<User, AuthError> {
        let _loading = self.begin()?;
        info!(identifier, "Logging in");

        let response = self
            .api
            .auth()
            .login(identifier, password)
            .await
            .inspect_err(|e| warn!(error = %e, "Login failed"))?;

        self.establish(response)
    }

    /// Register a new account; the backend logs it in straight away.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let _loading = self.begin()?;
        info!(username, "Registering account");

        let response = self
            .api
            .auth()
            .register(username, email, password)
            .await
            .inspect_err(|e| warn!(error = %e, "Registration failed"))?;

        self.establish(response)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        self.api.auth().forgot_password(email).await?;
        Ok(())
    }

    fn establish(&self, response: Value) -> Result<User, AuthError> {
        let auth: AuthResponse = serde_json::from_value(response)
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        let user_json = serde_json::to_string(&auth.user)
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        PersistedCredentials {
            token: auth.jwt.clone(),
            user: user_json,
        }
        .save(self.api.store())
        .map_err(AuthError::Storage)?;

        self.session.write().establish(auth.user.clone(), auth.jwt);
        info!(user_id = auth.user.id, username = %auth.user.username, "Logged in");
        Ok(auth.user)
    }

    /// Drop the session locally. No network call; safe to call repeatedly.
    pub fn logout(&self) {
        self.session.write().clear();
        if let Err(e) = PersistedCredentials::clear(self.api.store()) {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        debug!("Session cleared");
    }

    /// Restore a persisted session at startup and validate it against the
    /// backend. Any failure along the way ends in a full logout.
    ///
    /// Only fails if another login or restore is already running.
    pub async fn restore_session(&self) -> Result<SessionState, AuthError> {
        let _loading = self.begin()?;

        let persisted = match PersistedCredentials::load(self.api.store()) {
            Ok(Some(persisted)) => persisted,
            Ok(None) => {
                debug!("No persisted session");
                return Ok(SessionState::Unauthenticated);
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session");
                self.logout();
                return Ok(SessionState::Unauthenticated);
            }
        };

        let _restoring = FlagGuard::try_raise(&self.restoring);

        let stored_user: User = match serde_json::from_str(&persisted.user) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Persisted user is malformed");
                self.logout();
                return Ok(SessionState::Unauthenticated);
            }
        };
        debug!(user_id = stored_user.id, "Validating persisted session");

        // Optimistic: token only, the user arrives once validated
        self.session.write().set_token(persisted.token);

        let validated = match self.api.auth().me().await {
            Ok(value) => serde_json::from_value::<User>(value)
                .map_err(|e| AuthError::MalformedResponse(e.to_string())),
            Err(e) => Err(AuthError::Rejected(e)),
        };

        match validated {
            Ok(user) => {
                info!(user_id = user.id, username = %user.username, "Session restored");
                self.session.write().set_user(user);
                Ok(SessionState::Authenticated)
            }
            Err(e) => {
                warn!(error = %e, "Persisted session is no longer valid");
                self.logout();
                Ok(SessionState::Unauthenticated)
            }
        }
    }
}
