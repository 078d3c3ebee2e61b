use serde::{Deserialize, Serialize};

/// First-run state reported by `GET /setup/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupStatus {
    /// Whether an admin account has been created yet.
    #[serde(default)]
    pub initialized: bool,
}

/// Body for `POST /setup/admin`, creating the initial admin account.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAdminRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}
