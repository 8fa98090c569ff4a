//! Authentication module for managing the user session and its durable copy.
//!
//! This module provides:
//! - `SessionManager`: login, registration, logout and startup restore
//! - `Session`/`SessionHandle`: in-memory state shared with the API gateway
//! - `CredentialStore`: durable key-value storage for `authToken` and `user`
//! - `Navigator`: where the gateway sends the front end after a 401

pub mod credentials;
pub mod manager;
pub mod navigator;
pub mod session;
pub mod store;

pub use credentials::KeyringCredentialStore;
pub use manager::{AuthError, SessionManager};
pub use navigator::{Navigator, NoopNavigator, RecordingNavigator, LOGIN_ROUTE};
pub use session::{Session, SessionHandle, SessionState};
pub use store::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, PersistedCredentials,
    AUTH_TOKEN_KEY, USER_KEY,
};
