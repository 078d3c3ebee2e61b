//! Client library for the Ferelix media server.
//!
//! ferelix-client wraps the server's REST API (`/api/v1`) behind a typed
//! async client. Requests attach the stored access token; an expired-token
//! 401 triggers a single refresh round-trip shared by all concurrent
//! callers, and the failed call is replayed transparently. The token pair
//! persists across restarts in a small JSON store.
//!
//! Supporting pieces: `UserState` caches the current profile, `RouteGuard`
//! turns authentication state into navigation decisions, and `Config` wires
//! up the server origin and storage location.

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod state;

pub use api::{ApiClient, ApiError, RefreshError};
pub use auth::{TokenPair, TokenStore};
pub use config::Config;
pub use guard::{NavDecision, RouteGuard};
pub use state::UserState;
