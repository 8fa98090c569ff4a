//! Core library for cms-console.
//!
//! Session management, the API gateway client and resource forwarders for
//! a headless CMS backend, shared by the terminal front end.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod views;

pub use api::{ApiClient, ApiError, ApiResult, ListParams};
pub use auth::{AuthError, SessionManager, SessionState};
pub use config::Config;
