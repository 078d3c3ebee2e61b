//! Authentication module for the stored Ferelix session.
//!
//! This module provides:
//! - `TokenStore`: durable storage for the access/refresh token pair
//!
//! The pair is persisted to disk and survives application restarts; refresh
//! and expiry handling live in the API client.

pub mod tokens;

pub use tokens::{TokenPair, TokenStore};
