//! REST API client module for the Ferelix media server.
//!
//! This module provides the `ApiClient` for communicating with the
//! backend's `/api/v1` surface: authentication, first-run setup, and the
//! media catalog.
//!
//! The API uses bearer token authentication. Expired access tokens are
//! refreshed transparently, with concurrent callers sharing a single
//! refresh round-trip.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, RefreshError};
