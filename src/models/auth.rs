use serde::{Deserialize, Serialize};

use super::User;

/// Credentials submitted to `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub device_info: Option<String>,
}

/// Token pair issued on successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: Option<String>,
    /// Some server versions embed the profile to save a round-trip.
    pub user: Option<User>,
}

/// Body for `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// New pair minted by `POST /auth/refresh`.
/// The server rotates the refresh token on every use.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Body for `DELETE /auth/logout`, revoking the refresh token server-side.
#[derive(Debug, Clone, Serialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_serializes_null_device_info() {
        let request = LoginRequest {
            username: "sam".to_string(),
            password: "hunter2".to_string(),
            device_info: None,
        };
        let json = serde_json::to_value(&request).expect("Failed to serialize login request");
        assert_eq!(json["username"], "sam");
        assert!(json["device_info"].is_null());
    }

    #[test]
    fn login_response_tolerates_extra_fields() {
        let json = r#"{
            "access_token": "A1",
            "refresh_token": "B1",
            "token_type": "bearer",
            "expires_in": 900
        }"#;
        let response: LoginResponse =
            serde_json::from_str(json).expect("Failed to parse login response");
        assert_eq!(response.access_token, "A1");
        assert_eq!(response.refresh_token, "B1");
        assert!(response.user.is_none());
    }
}
