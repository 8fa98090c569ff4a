//! REST API client module for the CMS backend.
//!
//! This module provides the `ApiClient` gateway through which every backend
//! call passes, plus thin per-resource forwarders built on top of it.
//!
//! The backend uses JWT bearer token authentication obtained from
//! the `/auth/local` endpoint.

pub mod client;
pub mod error;
pub mod params;
pub mod resources;

pub use client::{ApiClient, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use error::{ApiError, ApiResult};
pub use params::ListParams;
