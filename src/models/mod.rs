//! Data models for the Ferelix API.
//!
//! Request and response types exchanged with the backend:
//!
//! - Auth payloads: `LoginRequest`/`LoginResponse`, refresh and logout bodies
//! - `User`: account profile with the admin flag
//! - `SetupStatus`, `CreateAdminRequest`: first-run setup
//! - `Movie`: media catalog entry

pub mod auth;
pub mod media;
pub mod setup;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RefreshResponse};
pub use media::Movie;
pub use setup::{CreateAdminRequest, SetupStatus};
pub use user::User;
