use thiserror::Error;

/// Errors surfaced by `ApiClient` calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-success response, after any refresh-and-retry has already run.
    #[error("HTTP {status}: {status_text}")]
    Http {
        status: u16,
        status_text: String,
        /// Response body parsed as JSON best-effort; `None` when unparseable.
        body: Option<serde_json::Value>,
    },

    #[error("Token refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Store(anyhow::Error),
}

impl ApiError {
    /// Build the error for a non-success response.
    /// The body is kept as parsed JSON when it parses; an unparseable body
    /// becomes `None` and never masks the HTTP failure itself.
    pub(crate) fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        ApiError::Http {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_string(),
            body: serde_json::from_str(body).ok(),
        }
    }

    /// HTTP status code, when this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Refresh(RefreshError::Rejected { status }) => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message from the error body, if the server sent one.
    /// Ferelix error bodies carry a `detail` field.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Http {
                body: Some(body), ..
            } => body.get("detail").and_then(|value| value.as_str()),
            _ => None,
        }
    }

    /// True when the session is beyond recovery and the embedding UI should
    /// return to its login surface.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Refresh(_))
    }
}

/// Why a token refresh settled with failure.
///
/// `Clone` because a single settlement is delivered to the initiating caller
/// and to every queued waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// A refresh was required but no refresh token is stored.
    #[error("No refresh token available")]
    MissingRefreshToken,

    /// The server rejected the refresh token. The stored pair has been
    /// cleared by the time this is observed.
    #[error("Refresh rejected with HTTP {status}")]
    Rejected { status: u16 },

    /// The refresh request never produced a verdict; stored tokens are kept.
    #[error("Refresh request failed: {message}")]
    Transport { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn from_response_parses_json_body() {
        let err = ApiError::from_response(StatusCode::NOT_FOUND, r#"{"detail": "no such movie"}"#);
        match &err {
            ApiError::Http {
                status,
                status_text,
                body,
            } => {
                assert_eq!(*status, 404);
                assert_eq!(status_text, "Not Found");
                assert!(body.is_some());
            }
            other => panic!("expected Http error, got {:?}", other),
        }
        assert_eq!(err.detail(), Some("no such movie"));
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn from_response_tolerates_non_json_body() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "<html>upstream died</html>");
        match err {
            ApiError::Http { status, body, .. } => {
                assert_eq!(status, 502);
                assert!(body.is_none());
            }
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[test]
    fn status_covers_refresh_rejection() {
        let err = ApiError::from(RefreshError::Rejected { status: 401 });
        assert_eq!(err.status(), Some(401));
        assert_eq!(
            err.to_string(),
            "Token refresh failed: Refresh rejected with HTTP 401"
        );
    }

    #[test]
    fn only_refresh_failures_require_login() {
        assert!(ApiError::from(RefreshError::MissingRefreshToken).requires_login());
        assert!(ApiError::from(RefreshError::Transport {
            message: "timed out".to_string(),
        })
        .requires_login());

        let http = ApiError::from_response(StatusCode::UNAUTHORIZED, "");
        assert!(!http.requires_login());
    }

    #[test]
    fn refresh_error_display() {
        assert_eq!(
            RefreshError::MissingRefreshToken.to_string(),
            "No refresh token available"
        );
        assert_eq!(
            RefreshError::Rejected { status: 403 }.to_string(),
            "Refresh rejected with HTTP 403"
        );
    }
}
