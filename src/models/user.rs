use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Ferelix account as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    /// Absent on older servers, which never meant admin.
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: Option<DateTime<Utc>>,
}
